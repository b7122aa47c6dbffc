//! FILENAME: core/band-report/src/band.rs
//! Bands - Which template a binding is rendered with.
//!
//! Group indices count outer to inner, matching `KeyedPolicy::groups()`:
//! with N groups, level k belongs to group N - k.

use band_engine::{Binding, BindingKind};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    ReportHeader,
    GroupHeader(usize),
    Detail,
    GroupFooter(usize),
    ReportFooter,
}

impl Band {
    pub fn classify(
        level: usize,
        kind: BindingKind,
        level_count: usize,
    ) -> Result<Band, ReportError> {
        let unmapped = ReportError::UnmappedBinding {
            level,
            kind,
            level_count,
        };
        let grand_level = level_count + 1;

        match kind {
            BindingKind::Detail if level == 0 => Ok(Band::Detail),
            BindingKind::Header if level == grand_level => Ok(Band::ReportHeader),
            BindingKind::Footer if level == grand_level => Ok(Band::ReportFooter),
            BindingKind::Header if (1..=level_count).contains(&level) => {
                Ok(Band::GroupHeader(level_count - level))
            }
            BindingKind::Footer if (1..=level_count).contains(&level) => {
                Ok(Band::GroupFooter(level_count - level))
            }
            _ => Err(unmapped),
        }
    }

    pub fn of<R, A>(binding: &Binding<R, A>, level_count: usize) -> Result<Band, ReportError> {
        Band::classify(binding.level, binding.kind, level_count)
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Band::ReportHeader | Band::GroupHeader(_))
    }

    pub fn is_footer(&self) -> bool {
        matches!(self, Band::ReportFooter | Band::GroupFooter(_))
    }

    /// Outer-to-inner group index for group bands.
    pub fn group_index(&self) -> Option<usize> {
        match self {
            Band::GroupHeader(index) | Band::GroupFooter(index) => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_every_level() {
        use BindingKind::*;

        assert_eq!(Band::classify(0, Detail, 2), Ok(Band::Detail));
        assert_eq!(Band::classify(3, Header, 2), Ok(Band::ReportHeader));
        assert_eq!(Band::classify(3, Footer, 2), Ok(Band::ReportFooter));
        assert_eq!(Band::classify(2, Header, 2), Ok(Band::GroupHeader(0)));
        assert_eq!(Band::classify(1, Footer, 2), Ok(Band::GroupFooter(1)));
    }

    #[test]
    fn test_unmapped_bindings() {
        use BindingKind::*;

        assert!(Band::classify(1, Detail, 2).is_err());
        assert!(Band::classify(0, Header, 2).is_err());
        assert_eq!(
            Band::classify(4, Footer, 2),
            Err(ReportError::UnmappedBinding {
                level: 4,
                kind: Footer,
                level_count: 2,
            })
        );
    }

    #[test]
    fn test_no_groups_only_report_bands() {
        assert_eq!(Band::classify(1, BindingKind::Header, 0), Ok(Band::ReportHeader));
        assert_eq!(Band::ReportFooter.group_index(), None);
        assert_eq!(Band::GroupHeader(1).group_index(), Some(1));
        assert!(Band::GroupFooter(0).is_footer());
        assert!(!Band::Detail.is_header());
    }
}
