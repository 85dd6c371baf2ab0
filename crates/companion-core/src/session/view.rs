//! Panel and icon kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A top-level widget panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum View {
    Discovery,
    Search,
    Chat,
    Profile,
}

/// An icon in the widget's launcher menu.
///
/// Search is reached from inside discovery and has no launcher icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    Profile,
    Discovery,
    Chat,
}

impl View {
    /// The launcher icon highlighted while this view is open.
    pub fn icon(self) -> Option<Icon> {
        match self {
            Self::Discovery => Some(Icon::Discovery),
            Self::Chat => Some(Icon::Chat),
            Self::Profile => Some(Icon::Profile),
            Self::Search => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_icon_mapping() {
        let with_icon: Vec<View> = View::iter().filter(|v| v.icon().is_some()).collect();
        assert_eq!(with_icon, vec![View::Discovery, View::Chat, View::Profile]);
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("profile".parse::<View>().unwrap(), View::Profile);
        assert!("settings".parse::<View>().is_err());
    }
}
