//! Hint depth: how many generation rounds a request goes through.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Target depth of a hint request, also used to label each generated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HintDepth {
    /// Conceptual `CONCEPT:` / `WHY:` hints.
    #[default]
    Level1,
    /// Adds `HOW:` implementation guidance.
    Level2,
    /// Adds fill-in-the-blank `CODE:` skeletons.
    Level3,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown hint depth '{0}' (expected level1, level2, or level3)")]
pub struct DepthParseError(pub String);

impl HintDepth {
    pub const ALL: [HintDepth; 3] = [HintDepth::Level1, HintDepth::Level2, HintDepth::Level3];

    /// 1-based level number.
    pub fn number(self) -> u8 {
        match self {
            HintDepth::Level1 => 1,
            HintDepth::Level2 => 2,
            HintDepth::Level3 => 3,
        }
    }

    /// Whether a request at this depth needs `level` to be generated.
    pub fn includes(self, level: HintDepth) -> bool {
        level <= self
    }

    /// The levels a request at this depth generates, in order.
    pub fn levels(self) -> impl Iterator<Item = HintDepth> {
        HintDepth::ALL.into_iter().filter(move |l| self.includes(*l))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HintDepth::Level1 => "level1",
            HintDepth::Level2 => "level2",
            HintDepth::Level3 => "level3",
        }
    }
}

impl FromStr for HintDepth {
    type Err = DepthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "level1" | "1" | "l1" | "concept" | "conceptual" | "basic" | "light" | "hint" => {
                Ok(HintDepth::Level1)
            }
            "level2" | "2" | "l2" | "how" | "implementation" | "guidance" | "medium" => {
                Ok(HintDepth::Level2)
            }
            "level3" | "3" | "l3" | "code" | "full" | "detailed" | "complete" | "deep" => {
                Ok(HintDepth::Level3)
            }
            _ => Err(DepthParseError(s.to_string())),
        }
    }
}

impl fmt::Display for HintDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_aliases() {
        assert_eq!("level1".parse::<HintDepth>().unwrap(), HintDepth::Level1);
        assert_eq!("Conceptual".parse::<HintDepth>().unwrap(), HintDepth::Level1);
        assert_eq!(" 2 ".parse::<HintDepth>().unwrap(), HintDepth::Level2);
        assert_eq!("implementation".parse::<HintDepth>().unwrap(), HintDepth::Level2);
        assert_eq!("FULL".parse::<HintDepth>().unwrap(), HintDepth::Level3);
        assert_eq!("code".parse::<HintDepth>().unwrap(), HintDepth::Level3);
    }

    #[test]
    fn test_parse_unknown_is_error() {
        let err = "level4".parse::<HintDepth>().unwrap_err();
        assert!(err.to_string().contains("level4"));
    }

    #[test]
    fn test_levels_for_each_depth() {
        let l1: Vec<_> = HintDepth::Level1.levels().collect();
        assert_eq!(l1, vec![HintDepth::Level1]);
        let l3: Vec<_> = HintDepth::Level3.levels().collect();
        assert_eq!(l3, HintDepth::ALL.to_vec());
        assert!(HintDepth::Level2.includes(HintDepth::Level2));
        assert!(!HintDepth::Level2.includes(HintDepth::Level3));
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&HintDepth::Level2).unwrap();
        assert_eq!(json, "\"level2\"");
    }
}
