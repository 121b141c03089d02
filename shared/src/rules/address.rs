//! Default-address rule
//!
//! A user has at most one default address. When an address becomes the
//! default, every other address of the same user whose flag is `true` or
//! unknown (NULL) is cleared.

/// Stored default flag of one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFlag {
    pub id: i32,
    pub is_default: Option<bool>,
}

/// Ids the reset scan must set to `false` when `keep` becomes the default.
///
/// `keep` is `None` while the new address has no id yet.
pub fn addresses_to_reset(flags: &[DefaultFlag], keep: Option<i32>) -> Vec<i32> {
    flags
        .iter()
        .filter(|flag| Some(flag.id) != keep)
        .filter(|flag| flag.is_default.unwrap_or(true))
        .map(|flag| flag.id)
        .collect()
}

/// Flag reported to clients; NULL reads as `false`
pub fn effective_default(is_default: Option<bool>) -> bool {
    is_default.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(id: i32, is_default: Option<bool>) -> DefaultFlag {
        DefaultFlag { id, is_default }
    }

    #[test]
    fn test_resets_previous_default() {
        let flags = [flag(1, Some(true)), flag(2, Some(false))];
        assert_eq!(addresses_to_reset(&flags, None), vec![1]);
    }

    #[test]
    fn test_null_flags_are_normalised() {
        let flags = [flag(1, None), flag(2, Some(false)), flag(3, None)];
        assert_eq!(addresses_to_reset(&flags, None), vec![1, 3]);
    }

    #[test]
    fn test_kept_address_is_untouched() {
        let flags = [flag(4, Some(true)), flag(5, Some(true))];
        assert_eq!(addresses_to_reset(&flags, Some(5)), vec![4]);
    }

    #[test]
    fn test_exactly_one_default_afterwards() {
        // Any prior mix of flags ends with only the chosen address set
        let flags = [
            flag(1, Some(true)),
            flag(2, None),
            flag(3, Some(true)),
            flag(4, Some(false)),
        ];
        let reset = addresses_to_reset(&flags, Some(3));
        let defaults: Vec<i32> = flags
            .iter()
            .map(|f| {
                let value = if reset.contains(&f.id) {
                    Some(false)
                } else if f.id == 3 {
                    Some(true)
                } else {
                    f.is_default
                };
                (f.id, effective_default(value))
            })
            .filter(|(_, is_default)| *is_default)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(defaults, vec![3]);
    }

    #[test]
    fn test_effective_default() {
        assert!(effective_default(Some(true)));
        assert!(!effective_default(Some(false)));
        assert!(!effective_default(None));
    }
}
