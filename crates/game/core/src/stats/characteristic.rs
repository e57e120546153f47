//! The five characteristics and the die codes that back them.

use core::fmt;

use bitflags::bitflags;
use strum::{EnumIter, IntoEnumIterator};

use crate::text::fold;

/// One of the five core stats. Each is rolled with the die of its [`DieCode`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    strum::Display,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Characteristic {
    Puissance,
    Agilite,
    Perception,
    Volonte,
    Pouvoir,
}

impl Characteristic {
    pub const COUNT: usize = 5;

    /// Storage key (`"agilite"`).
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Display label with accents (`"Agilité"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Puissance => "Puissance",
            Self::Agilite => "Agilité",
            Self::Perception => "Perception",
            Self::Volonte => "Volonté",
            Self::Pouvoir => "Pouvoir",
        }
    }

    /// Parses a key or label, ignoring case and accents.
    pub fn from_label(raw: &str) -> Option<Self> {
        let folded = fold(raw.trim());
        Self::iter().find(|carac| carac.key() == folded)
    }

    pub const fn flag(self) -> CaracSet {
        match self {
            Self::Puissance => CaracSet::PUISSANCE,
            Self::Agilite => CaracSet::AGILITE,
            Self::Perception => CaracSet::PERCEPTION,
            Self::Volonte => CaracSet::VOLONTE,
            Self::Pouvoir => CaracSet::POUVOIR,
        }
    }
}

bitflags! {
    /// Set of characteristics, used by trait mechanics and secret triggers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CaracSet: u8 {
        const PUISSANCE = 1 << 0;
        const AGILITE = 1 << 1;
        const PERCEPTION = 1 << 2;
        const VOLONTE = 1 << 3;
        const POUVOIR = 1 << 4;
    }
}

impl CaracSet {
    pub fn has(self, carac: Characteristic) -> bool {
        self.contains(carac.flag())
    }

    pub fn caracs(self) -> impl Iterator<Item = Characteristic> {
        Characteristic::iter().filter(move |carac| self.has(*carac))
    }
}

impl FromIterator<Characteristic> for CaracSet {
    fn from_iter<I: IntoIterator<Item = Characteristic>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CaracSet::empty(), |set, carac| set | carac.flag())
    }
}

// Serialized as a list of keys so content files read `["volonte"]`.
#[cfg(feature = "serde")]
impl serde::Serialize for CaracSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.caracs())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CaracSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let list = <Vec<Characteristic> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

/// Die size backing a characteristic or a skill level (`d4`..`d12`).
///
/// Construction always succeeds: anything that does not describe at least a
/// two-sided die is normalized to [`DieCode::DEFAULT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DieCode(u32);

impl DieCode {
    pub const DEFAULT_FACES: u32 = 6;
    pub const DEFAULT: Self = Self(Self::DEFAULT_FACES);
    pub const D4: Self = Self(4);
    pub const D6: Self = Self(6);
    pub const D8: Self = Self(8);
    pub const D10: Self = Self(10);
    pub const D12: Self = Self(12);

    pub fn new(faces: u32) -> Self {
        if faces < 2 { Self::DEFAULT } else { Self(faces) }
    }

    pub const fn faces(self) -> u32 {
        self.0
    }

    /// Normalizes free-form die text: `"8"`, `"d8"`, `"1d8"` and `"2d8"` all
    /// yield a d8. Unreadable text falls back to a d6.
    pub fn normalize(raw: &str) -> Self {
        match Self::parse_faces(raw) {
            Some(faces) if faces >= 2 => Self(faces),
            _ => {
                if !raw.trim().is_empty() {
                    tracing::warn!("malformed die code {:?}, using d{}", raw, Self::DEFAULT_FACES);
                }
                Self::DEFAULT
            }
        }
    }

    fn parse_faces(raw: &str) -> Option<u32> {
        let text = raw.trim().to_ascii_lowercase();
        let faces = match text.split_once('d') {
            Some((count, faces)) => {
                if !count.is_empty() {
                    count.parse::<u32>().ok()?;
                }
                faces
            }
            None => text.as_str(),
        };
        faces.parse().ok()
    }
}

impl Default for DieCode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DieCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DieCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// Accepts `"d8"` as well as bare numbers; bad data degrades to a d6.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DieCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DieVisitor;

        impl serde::de::Visitor<'_> for DieVisitor {
            type Value = DieCode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a die code such as \"d8\" or a face count")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<DieCode, E> {
                Ok(DieCode::normalize(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<DieCode, E> {
                Ok(DieCode::new(u32::try_from(v).unwrap_or(0)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<DieCode, E> {
                Ok(DieCode::new(u32::try_from(v).unwrap_or(0)))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<DieCode, E> {
                Ok(DieCode::DEFAULT)
            }
        }

        deserializer.deserialize_any(DieVisitor)
    }
}

/// The die code of each characteristic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Attributes {
    pub puissance: DieCode,
    pub agilite: DieCode,
    pub perception: DieCode,
    pub volonte: DieCode,
    pub pouvoir: DieCode,
}

impl Attributes {
    pub fn get(&self, carac: Characteristic) -> DieCode {
        match carac {
            Characteristic::Puissance => self.puissance,
            Characteristic::Agilite => self.agilite,
            Characteristic::Perception => self.perception,
            Characteristic::Volonte => self.volonte,
            Characteristic::Pouvoir => self.pouvoir,
        }
    }

    pub fn set(&mut self, carac: Characteristic, die: DieCode) {
        let slot = match carac {
            Characteristic::Puissance => &mut self.puissance,
            Characteristic::Agilite => &mut self.agilite,
            Characteristic::Perception => &mut self.perception,
            Characteristic::Volonte => &mut self.volonte,
            Characteristic::Pouvoir => &mut self.pouvoir,
        };
        *slot = die;
    }
}
