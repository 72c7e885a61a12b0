//! Linked-sides box model.
//!
//! Margin, padding, border width and border radius each have four values and
//! a `linked` flag. While a group is linked at a breakpoint, every write sets
//! all four values at that breakpoint, so the sides can never disagree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::aliases;
use crate::resolve::{resolve_flag, resolve_raw};
use crate::value::normalize_length;
use crate::{Breakpoint, StyleBag, StyleError, StyleResult};

/// A four-sided property group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxGroup {
    /// Outer spacing.
    Margin,
    /// Inner spacing.
    Padding,
    /// Border width per side.
    BorderWidth,
    /// Border radius per corner.
    BorderRadius,
}

impl BoxGroup {
    /// All groups.
    pub const ALL: [Self; 4] = [
        Self::Margin,
        Self::Padding,
        Self::BorderWidth,
        Self::BorderRadius,
    ];

    /// Key prefix shared by the group's keys.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::BorderWidth => "border_width",
            Self::BorderRadius => "border_radius",
        }
    }

    /// Canonical side/corner keys in schema order (top, right, bottom, left;
    /// or top-left, top-right, bottom-right, bottom-left).
    #[must_use]
    pub const fn side_keys(self) -> [&'static str; 4] {
        match self {
            Self::Margin => ["margin_top", "margin_right", "margin_bottom", "margin_left"],
            Self::Padding => ["padding_top", "padding_right", "padding_bottom", "padding_left"],
            Self::BorderWidth => [
                "border_width_top",
                "border_width_right",
                "border_width_bottom",
                "border_width_left",
            ],
            Self::BorderRadius => [
                "border_radius_tl",
                "border_radius_tr",
                "border_radius_br",
                "border_radius_bl",
            ],
        }
    }

    /// Key of the `linked` flag at the base breakpoint.
    #[must_use]
    pub const fn linked_key(self) -> &'static str {
        match self {
            Self::Margin => "margin_linked",
            Self::Padding => "padding_linked",
            Self::BorderWidth => "border_width_linked",
            Self::BorderRadius => "border_radius_linked",
        }
    }

    /// CSS property the group folds into.
    #[must_use]
    pub const fn css_property(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::BorderWidth => "border-width",
            Self::BorderRadius => "border-radius",
        }
    }

    /// Canonical key of a side.
    #[must_use]
    pub const fn side_key(self, side: Side) -> &'static str {
        self.side_keys()[side.index()]
    }

    /// Group whose `linked` flag is stored under a base key, if any.
    #[must_use]
    pub fn for_linked_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.linked_key() == key)
    }

    /// Group and side owning a canonical base key, if any.
    #[must_use]
    pub fn for_side_key(key: &str) -> Option<(Self, Side)> {
        Self::ALL.iter().find_map(|group| {
            group
                .side_keys()
                .iter()
                .position(|k| *k == key)
                .map(|index| (*group, Side::ALL[index]))
        })
    }
}

impl fmt::Display for BoxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for BoxGroup {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        match s {
            "margin" => Ok(Self::Margin),
            "padding" => Ok(Self::Padding),
            "border_width" | "border-width" | "width" => Ok(Self::BorderWidth),
            "border_radius" | "border-radius" | "radius" => Ok(Self::BorderRadius),
            _ => Err(StyleError::UnknownBoxGroup(s.to_string())),
        }
    }
}

/// A side of a box, or the corner at the same position for border radius
/// (`Top` is top-left, `Right` top-right, `Bottom` bottom-right, `Left`
/// bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Top side / top-left corner.
    Top,
    /// Right side / top-right corner.
    Right,
    /// Bottom side / bottom-right corner.
    Bottom,
    /// Left side / bottom-left corner.
    Left,
}

impl Side {
    /// All sides in schema order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

impl FromStr for Side {
    type Err = StyleError;

    fn from_str(s: &str) -> StyleResult<Self> {
        match s {
            "top" | "tl" | "top_left" => Ok(Self::Top),
            "right" | "tr" | "top_right" => Ok(Self::Right),
            "bottom" | "br" | "bottom_right" => Ok(Self::Bottom),
            "left" | "bl" | "bottom_left" => Ok(Self::Left),
            _ => Err(StyleError::UnknownSide(s.to_string())),
        }
    }
}

fn write_all(bag: &mut StyleBag, group: BoxGroup, value: &str, breakpoint: Breakpoint) {
    for key in group.side_keys() {
        bag.set(breakpoint.key(key), value);
    }
}

fn broadcast_primary(bag: &mut StyleBag, group: BoxGroup, breakpoint: Breakpoint) {
    let primary = resolve_raw(bag, group.side_key(Side::Top), breakpoint)
        .map_or_else(|| "0px".to_string(), normalize_length);
    write_all(bag, group, &primary, breakpoint);
}

/// Make the sides equal again wherever the group is linked and reads the
/// values just changed at `breakpoint`.
///
/// Tablet and mobile fall back to desktop values and may inherit the desktop
/// flag, so a desktop change reconciles every breakpoint.
fn reconcile(bag: &mut StyleBag, group: BoxGroup, breakpoint: Breakpoint) {
    let affected: &[Breakpoint] = if breakpoint.is_base() {
        &Breakpoint::ALL
    } else {
        std::slice::from_ref(&breakpoint)
    };
    for &bp in affected {
        if !resolve_flag(bag, group, bp) {
            continue;
        }
        let [first, rest @ ..] = sides(bag, group, bp);
        if rest.iter().any(|side| *side != first) {
            tracing::debug!(group = %group, breakpoint = %bp, "broadcasting primary side");
            broadcast_primary(bag, group, bp);
        }
    }
}

/// Write one side of a group at a breakpoint.
///
/// The value is normalized first (bare numbers gain `px`, junk becomes
/// `0px`). When the group is linked at this breakpoint all four sides receive
/// the value.
pub fn set_side(
    bag: &mut StyleBag,
    group: BoxGroup,
    side: Side,
    value: impl Into<Value>,
    breakpoint: Breakpoint,
) {
    let normalized = normalize_length(&value.into());
    if resolve_flag(bag, group, breakpoint) {
        write_all(bag, group, &normalized, breakpoint);
    } else {
        bag.set(breakpoint.key(group.side_key(side)), normalized);
    }
    reconcile(bag, group, breakpoint);
}

/// Remove one side of a group at a breakpoint, with its alias spellings.
///
/// A linked group loses all four sides there, so the breakpoint falls back
/// as a whole.
pub fn clear_side(bag: &mut StyleBag, group: BoxGroup, side: Side, breakpoint: Breakpoint) {
    let keys = if resolve_flag(bag, group, breakpoint) {
        group.side_keys().to_vec()
    } else {
        vec![group.side_key(side)]
    };
    for key in keys {
        for spelling in std::iter::once(key).chain(aliases(key).iter().copied()) {
            bag.remove(&breakpoint.key(spelling));
        }
    }
    reconcile(bag, group, breakpoint);
}

/// Store the `linked` flag of a group at a breakpoint; `None` removes the
/// stored flag so the breakpoint inherits again.
///
/// Whenever the group ends up linked the primary side (top / top-left) is
/// copied to all four sides. Unlinking leaves values alone. Returns the new
/// effective state.
pub fn set_linked(
    bag: &mut StyleBag,
    group: BoxGroup,
    linked: Option<bool>,
    breakpoint: Breakpoint,
) -> bool {
    let key = breakpoint.key(group.linked_key()).into_owned();
    match linked {
        Some(flag) => {
            bag.set(key, flag);
        }
        None => {
            bag.remove(&key);
        }
    }
    reconcile(bag, group, breakpoint);
    resolve_flag(bag, group, breakpoint)
}

/// Flip the effective `linked` flag of a group at a breakpoint.
///
/// Linking copies the primary side (top / top-left) to all four sides at that
/// breakpoint, and at every breakpoint that inherits the flag. Unlinking
/// leaves values alone. Returns the new state.
pub fn toggle_link(bag: &mut StyleBag, group: BoxGroup, breakpoint: Breakpoint) -> bool {
    let linked = !resolve_flag(bag, group, breakpoint);
    set_linked(bag, group, Some(linked), breakpoint)
}

/// Effective values of all four sides at a breakpoint, in schema order.
/// Unset sides read as `0px`.
#[must_use]
pub fn sides(bag: &StyleBag, group: BoxGroup, breakpoint: Breakpoint) -> [String; 4] {
    group.side_keys().map(|key| {
        resolve_raw(bag, key, breakpoint).map_or_else(|| "0px".to_string(), normalize_length)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_then_write_sets_all_sides() {
        let mut bag = StyleBag::new();
        assert!(toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Desktop));
        set_side(&mut bag, BoxGroup::Margin, Side::Top, "10px", Breakpoint::Desktop);

        for key in BoxGroup::Margin.side_keys() {
            assert_eq!(bag.get(key), Some(&json!("10px")), "{key}");
        }
    }

    #[test]
    fn test_linked_write_propagates_from_written_side() {
        let mut bag = StyleBag::new();
        bag.set("padding_linked", true);
        set_side(&mut bag, BoxGroup::Padding, Side::Left, 6, Breakpoint::Desktop);
        assert_eq!(
            sides(&bag, BoxGroup::Padding, Breakpoint::Desktop),
            ["6px", "6px", "6px", "6px"]
        );
    }

    #[test]
    fn test_unlinked_write_touches_one_side() {
        let mut bag = StyleBag::new();
        set_side(&mut bag, BoxGroup::BorderRadius, Side::Bottom, "12", Breakpoint::Desktop);
        assert_eq!(bag.get("border_radius_br"), Some(&json!("12px")));
        assert!(bag.get("border_radius_tl").is_none());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_toggle_link_broadcasts_primary() {
        let mut bag = StyleBag::new();
        bag.set("border_width_top", "3px");
        bag.set("border_width_left", "1px");
        assert!(toggle_link(&mut bag, BoxGroup::BorderWidth, Breakpoint::Desktop));
        assert_eq!(
            sides(&bag, BoxGroup::BorderWidth, Breakpoint::Desktop),
            ["3px", "3px", "3px", "3px"]
        );
    }

    #[test]
    fn test_unlink_changes_no_values() {
        let mut bag = StyleBag::new();
        bag.set("margin_top", "5px");
        toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Desktop);
        let linked = bag.clone();
        assert!(!toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Desktop));
        for key in BoxGroup::Margin.side_keys() {
            assert_eq!(bag.get(key), linked.get(key));
        }
        set_side(&mut bag, BoxGroup::Margin, Side::Right, "9px", Breakpoint::Desktop);
        assert_eq!(
            sides(&bag, BoxGroup::Margin, Breakpoint::Desktop),
            ["5px", "9px", "5px", "5px"]
        );
    }

    #[test]
    fn test_linking_is_per_breakpoint() {
        let mut bag = StyleBag::new();
        bag.set("margin_top", "20px");
        assert!(toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Tablet));
        assert_eq!(bag.get("margin_linked_tablet"), Some(&json!(true)));
        // Tablet inherits the desktop top value as its primary.
        assert_eq!(
            sides(&bag, BoxGroup::Margin, Breakpoint::Tablet),
            ["20px", "20px", "20px", "20px"]
        );
        // Desktop is untouched.
        assert!(bag.get("margin_right").is_none());
        assert!(!crate::resolve_flag(&bag, BoxGroup::Margin, Breakpoint::Desktop));

        set_side(&mut bag, BoxGroup::Margin, Side::Top, "4px", Breakpoint::Mobile);
        assert_eq!(bag.get("margin_top_mobile"), Some(&json!("4px")));
        assert!(bag.get("margin_right_mobile").is_none());
    }

    #[test]
    fn test_toggle_at_tablet_unlinks_inherited_flag() {
        let mut bag = StyleBag::new();
        bag.set("padding_linked", true);
        assert!(!toggle_link(&mut bag, BoxGroup::Padding, Breakpoint::Tablet));
        assert_eq!(bag.get("padding_linked_tablet"), Some(&json!(false)));
        assert!(crate::resolve_flag(&bag, BoxGroup::Padding, Breakpoint::Desktop));
    }

    #[test]
    fn test_desktop_link_reconciles_inheriting_breakpoints() {
        let mut bag = StyleBag::new();
        set_side(&mut bag, BoxGroup::Margin, Side::Top, "5px", Breakpoint::Tablet);
        assert!(toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Desktop));
        set_side(&mut bag, BoxGroup::Margin, Side::Top, "20px", Breakpoint::Desktop);

        assert!(crate::resolve_flag(&bag, BoxGroup::Margin, Breakpoint::Tablet));
        assert_eq!(
            sides(&bag, BoxGroup::Margin, Breakpoint::Tablet),
            ["5px", "5px", "5px", "5px"]
        );
        assert_eq!(
            sides(&bag, BoxGroup::Margin, Breakpoint::Mobile),
            ["20px", "20px", "20px", "20px"]
        );
    }

    #[test]
    fn test_unlinked_desktop_write_keeps_linked_tablet_equal() {
        let mut bag = StyleBag::new();
        assert!(toggle_link(&mut bag, BoxGroup::Padding, Breakpoint::Tablet));
        set_side(&mut bag, BoxGroup::Padding, Side::Top, "7px", Breakpoint::Desktop);

        assert_eq!(
            sides(&bag, BoxGroup::Padding, Breakpoint::Desktop),
            ["7px", "0px", "0px", "0px"]
        );
        assert_eq!(
            sides(&bag, BoxGroup::Padding, Breakpoint::Tablet),
            ["7px", "7px", "7px", "7px"]
        );
    }

    #[test]
    fn test_clear_side() {
        let mut bag = StyleBag::new();
        bag.set("marginLeft", "3px");
        bag.set("margin_left", "4px");
        bag.set("margin_top", "8px");
        clear_side(&mut bag, BoxGroup::Margin, Side::Left, Breakpoint::Desktop);
        assert!(bag.raw("marginLeft").is_none());
        assert!(bag.raw("margin_left").is_none());
        assert_eq!(bag.get("margin_top"), Some(&json!("8px")));

        toggle_link(&mut bag, BoxGroup::Margin, Breakpoint::Desktop);
        clear_side(&mut bag, BoxGroup::Margin, Side::Right, Breakpoint::Desktop);
        for key in BoxGroup::Margin.side_keys() {
            assert!(bag.get(key).is_none(), "{key}");
        }
    }

    #[test]
    fn test_set_linked_none_inherits_again() {
        let mut bag = StyleBag::new();
        bag.set("border_width_linked", true);
        bag.set("border_width_linked_mobile", false);
        set_side(&mut bag, BoxGroup::BorderWidth, Side::Left, "2px", Breakpoint::Mobile);

        assert!(set_linked(&mut bag, BoxGroup::BorderWidth, None, Breakpoint::Mobile));
        assert!(bag.raw("border_width_linked_mobile").is_none());
        assert_eq!(
            sides(&bag, BoxGroup::BorderWidth, Breakpoint::Mobile),
            ["0px", "0px", "0px", "0px"]
        );
        assert_eq!(BoxGroup::for_linked_key("border_width_linked"), Some(BoxGroup::BorderWidth));
        assert_eq!(BoxGroup::for_linked_key("border_width"), None);
    }

    #[test]
    fn test_empty_input_normalizes_to_zero() {
        let mut bag = StyleBag::new();
        set_side(&mut bag, BoxGroup::Padding, Side::Top, "", Breakpoint::Desktop);
        assert_eq!(bag.get("padding_top"), Some(&json!("0px")));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("border_radius".parse::<BoxGroup>().unwrap(), BoxGroup::BorderRadius);
        assert_eq!("tl".parse::<Side>().unwrap(), Side::Top);
        assert!("diagonal".parse::<Side>().is_err());
        assert_eq!(
            BoxGroup::for_side_key("border_radius_br"),
            Some((BoxGroup::BorderRadius, Side::Bottom))
        );
        assert_eq!(BoxGroup::for_side_key("margin"), None);
    }
}
