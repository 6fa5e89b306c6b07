use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn from_str(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(RepId);
id_newtype!(OutletId);
id_newtype!(CampaignId);

/// Prefix marking outlets outside a rep's journey plan.
pub const NOT_IN_PJP_PREFIX: &str = "notinpjp-";

impl OutletId {
    /// Id of the `index`-th outlet on a rep's journey plan.
    pub fn in_pjp(rep: &RepId, index: usize) -> Self {
        Self(format!("{}-{}", rep.as_str(), index))
    }

    /// Id of the `index`-th additional outlet offered for a rep.
    pub fn not_in_pjp(rep: &RepId, index: usize) -> Self {
        Self(format!("{NOT_IN_PJP_PREFIX}{}-{}", rep.as_str(), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlet_ids_follow_partition_convention() {
        let rep = RepId::from_str("2");
        assert_eq!(OutletId::in_pjp(&rep, 3).as_str(), "2-3");
        assert_eq!(OutletId::not_in_pjp(&rep, 0).as_str(), "notinpjp-2-0");
    }

    #[test]
    fn campaign_ids_are_unique() {
        assert_ne!(CampaignId::new(), CampaignId::new());
    }
}
