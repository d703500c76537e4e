/// Elemental affinity carried by stat blocks and actions.
///
/// The engine passes affinities through untouched; no resistance or weakness
/// math is attached to them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    None,
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}
