//! # 最大公约数
//!
//! 帧延迟序列的公共时间粒度（tick）由各帧延迟的最大公约数决定。
//!
//! 约定：
//! - `None` 与 `0` 都视为"无约束"，在两两求值中充当单位元；
//! - 空序列返回 `1`；
//! - 全部为 0 时返回 `0`，由调用方显式处理，绝不在此处做除零运算。

/// 两个可缺省操作数的最大公约数。
///
/// 任一侧缺省（或为 0）时直接返回另一侧；两侧都缺省时返回 `0`。
pub fn gcd_pair(a: Option<u32>, b: Option<u32>) -> u32 {
    match (non_zero(a), non_zero(b)) {
        (Some(a), Some(b)) => euclid(a, b),
        (Some(value), None) | (None, Some(value)) => value,
        (None, None) => 0,
    }
}

/// 整个延迟序列的最大公约数。
///
/// ```
/// use chat_media::animation::gcd_of;
///
/// assert_eq!(gcd_of(&[30, 45, 60]), 15);
/// assert_eq!(gcd_of(&[]), 1);
/// assert_eq!(gcd_of(&[0, 0]), 0);
/// ```
pub fn gcd_of(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 1;
    }

    values
        .iter()
        .fold(0, |acc, &value| gcd_pair(Some(acc), Some(value)))
}

fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

/// 辗转相除，调用方保证两个操作数都大于 0。
fn euclid(a: u32, b: u32) -> u32 {
    let (mut larger, mut smaller) = if a >= b { (a, b) } else { (b, a) };

    loop {
        let rest = larger % smaller;
        if rest == 0 {
            return smaller;
        }
        larger = smaller;
        smaller = rest;
    }
}
