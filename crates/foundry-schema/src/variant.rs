//! Asset variants
//!
//! A [`Variant`] selects the schema a config must follow. Variants are
//! mutually incompatible shapes; a config never mixes fields of two.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Asset configuration shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Character portrait
    NpcPortrait,
    /// Weapon or item render
    WeaponItem,
    /// Environment concept art
    EnvironmentConcept,
}

impl Variant {
    /// Every variant, in declaration order
    pub const ALL: [Self; 3] = [Self::NpcPortrait, Self::WeaponItem, Self::EnvironmentConcept];

    /// Wire identifier (`assetType` value)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NpcPortrait => "npc_portrait",
            Self::WeaponItem => "weapon_item",
            Self::EnvironmentConcept => "environment_concept",
        }
    }

    /// Short alias accepted on the command line
    #[inline]
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::NpcPortrait => "npc",
            Self::WeaponItem => "weapon",
            Self::EnvironmentConcept => "environment",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted) || v.alias().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Name that matches no variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset type: {0} (expected one of npc_portrait, weapon_item, environment_concept)")]
pub struct UnknownVariant(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parse_ids_and_aliases() {
        assert_eq!("weapon_item".parse::<Variant>().unwrap(), Variant::WeaponItem);
        assert_eq!("weapon".parse::<Variant>().unwrap(), Variant::WeaponItem);
        assert_eq!(" NPC ".parse::<Variant>().unwrap(), Variant::NpcPortrait);
        assert_eq!(
            "environment".parse::<Variant>().unwrap(),
            Variant::EnvironmentConcept
        );
    }

    #[test]
    fn variant_parse_unknown() {
        let err = "vehicle".parse::<Variant>().unwrap_err();
        assert_eq!(err, UnknownVariant("vehicle".to_string()));
    }

    #[test]
    fn variant_serde_uses_wire_id() {
        let json = serde_json::to_string(&Variant::EnvironmentConcept).unwrap();
        assert_eq!(json, "\"environment_concept\"");
        for variant in Variant::ALL {
            assert_eq!(variant.to_string(), variant.as_str());
        }
    }
}
