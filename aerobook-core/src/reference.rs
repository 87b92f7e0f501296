use std::future::Future;

use rand::Rng;

use crate::repository::StoreResult;

pub const BOOKING_PREFIX: &str = "BK";
pub const BOOKING_DIGITS: usize = 6;

pub const TICKET_PREFIX: &str = "TKT";
pub const TICKET_DIGITS: usize = 5;

/// Mint a human-readable code: `prefix` followed by `digit_count` random
/// decimal digits.
pub fn generate(prefix: &str, digit_count: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(prefix.len() + digit_count);
    code.push_str(prefix);
    for _ in 0..digit_count {
        code.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    code
}

/// Keep minting candidates until the existence probe reports the code free.
///
/// The probe is an optimization to cut down collision retries; the store's
/// unique constraint at commit time remains the authoritative guard, and
/// insert paths re-mint on a duplicate-key failure. Unbounded retries are
/// acceptable in a 10^5-10^6 code namespace.
pub async fn ensure_unique<C, E, Fut>(mut candidate: C, exists: E) -> StoreResult<String>
where
    C: FnMut() -> String,
    E: Fn(String) -> Fut,
    Fut: Future<Output = StoreResult<bool>>,
{
    loop {
        let code = candidate();
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        tracing::debug!(code, "reference code already taken, reminting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn generated_codes_match_expected_shape() {
        for _ in 0..100 {
            let code = generate(BOOKING_PREFIX, BOOKING_DIGITS);
            assert_eq!(code.len(), 8);
            assert!(code.starts_with("BK"));
            assert!(code[2..].chars().all(|c| c.is_ascii_digit()));

            let ticket = generate(TICKET_PREFIX, TICKET_DIGITS);
            assert_eq!(ticket.len(), 8);
            assert!(ticket.starts_with("TKT"));
            assert!(ticket[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn ensure_unique_skips_taken_candidates() {
        let sequence = Cell::new(0u32);
        let code = ensure_unique(
            || {
                let n = sequence.get();
                sequence.set(n + 1);
                format!("BK00000{n}")
            },
            |candidate| async move { Ok::<_, crate::repository::StoreError>(candidate != "BK000002") },
        )
        .await
        .unwrap();

        assert_eq!(code, "BK000002");
    }
}
