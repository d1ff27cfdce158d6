//! Synthetic asset records and the fixed lookup tables they are drawn from.

use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::{Builder, Uuid};

/// Chord names a sample can carry.
pub const CHORDS: [&str; 2] = ["major", "minor"];

/// Musical keys a sample can carry.
pub const KEYS: [&str; 6] = ["a#", "c", "d", "d#", "e", "e#"];

/// Tempo values, in beats per minute.
pub const BPMS: [i64; 5] = [16, 32, 64, 120, 240];

/// Which side of the schema a workflow works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTarget {
    /// The flat `sample` table, one row per asset.
    Sample,
    /// The `asset_data` table, four attribute rows per asset.
    Metadata,
}

impl AssetTarget {
    pub fn from_sample_flag(sample: bool) -> Self {
        if sample {
            AssetTarget::Sample
        } else {
            AssetTarget::Metadata
        }
    }

    /// Name of the table holding the `id`/`asset_uuid` pairs for this target.
    pub fn table_name(&self) -> &'static str {
        match self {
            AssetTarget::Sample => "sample",
            AssetTarget::Metadata => "asset_data",
        }
    }
}

/// A row of the `sample` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Sample {
    pub uuid: String,
    pub asset_uuid: String,
    pub chord: String,
    #[sqlx(rename = "skey")]
    pub key: String,
    pub bpm: i64,
    pub name: String,
}

impl Sample {
    /// Draws chord, key and tempo uniformly from the lookup tables.
    /// The primary uuid doubles as the asset uuid.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let attributes = RandomAttributes::draw(rng);
        let uuid = random_uuid(rng).to_string();
        Sample {
            asset_uuid: uuid.clone(),
            uuid,
            chord: attributes.chord.to_string(),
            key: attributes.key.to_string(),
            bpm: attributes.bpm,
            name: random_uuid(rng).to_string(),
        }
    }
}

/// Identifiers of the rows in the `metadata` definition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i64)]
pub enum MetadataField {
    Chord = 1,
    Key = 2,
    Tempo = 3,
    Name = 4,
}

impl MetadataField {
    pub const ALL: [MetadataField; 4] = [
        MetadataField::Chord,
        MetadataField::Key,
        MetadataField::Tempo,
        MetadataField::Name,
    ];

    pub fn id(&self) -> i64 {
        *self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetadataField::Chord => "chord",
            MetadataField::Key => "key",
            MetadataField::Tempo => "tempo",
            MetadataField::Name => "name",
        }
    }

    pub fn datatype(&self) -> &'static str {
        match self {
            MetadataField::Tempo => "int",
            _ => "string",
        }
    }
}

/// A row of the `asset_data` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDataRow {
    pub asset_uuid: String,
    pub field: MetadataField,
    pub value: String,
}

impl AssetDataRow {
    /// Generates the four attribute rows of one fresh asset, in field id order.
    pub fn random_asset<R: Rng + ?Sized>(rng: &mut R) -> [AssetDataRow; 4] {
        let attributes = RandomAttributes::draw(rng);
        let asset_uuid = random_uuid(rng).to_string();
        let row = |field: MetadataField, value: String| AssetDataRow {
            asset_uuid: asset_uuid.clone(),
            field,
            value,
        };
        [
            row(MetadataField::Chord, attributes.chord.to_string()),
            row(MetadataField::Key, attributes.key.to_string()),
            row(MetadataField::Tempo, attributes.bpm.to_string()),
            row(MetadataField::Name, random_uuid(rng).to_string()),
        ]
    }
}

/// One row of the `asset_data` / `metadata` join read back by the query runner.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AssetMetadata {
    pub asset_uuid: String,
    pub asset_metadata_id: i64,
    pub name: String,
    pub datatype: String,
    pub value: String,
}

struct RandomAttributes {
    chord: &'static str,
    key: &'static str,
    bpm: i64,
}

impl RandomAttributes {
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // The lookup tables are non-empty constants, choose() cannot miss.
        RandomAttributes {
            chord: CHORDS.choose(rng).copied().unwrap_or(CHORDS[0]),
            key: KEYS.choose(rng).copied().unwrap_or(KEYS[0]),
            bpm: BPMS.choose(rng).copied().unwrap_or(BPMS[0]),
        }
    }
}

/// A v4 uuid built from the caller's random source, so seeded runs repeat.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}
