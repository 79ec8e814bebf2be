//! Block material catalog

/// Material stored in a single terrain cell, one byte per cell.
///
/// The discriminants are the on-disk/in-memory byte codes. `None` is air and
/// doubles as the "no block" sentinel.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockMaterial {
    #[default]
    None = 0x00,

    BedRock = 0x01,
    Rock = 0x02,
    Clay = 0x03,
    Sand = 0x04,
    Soil = 0x05,

    Coal = 0x10,
    Iron = 0x11,
    Copper = 0x12,
    Silver = 0x13,
    Gold = 0x14,
    Gem = 0x15,

    Grass = 0xfe,
    Water = 0xff,
}

impl BlockMaterial {
    /// Every material in catalog order
    pub const ALL: [BlockMaterial; 14] = [
        BlockMaterial::None,
        BlockMaterial::BedRock,
        BlockMaterial::Rock,
        BlockMaterial::Clay,
        BlockMaterial::Sand,
        BlockMaterial::Soil,
        BlockMaterial::Coal,
        BlockMaterial::Iron,
        BlockMaterial::Copper,
        BlockMaterial::Silver,
        BlockMaterial::Gold,
        BlockMaterial::Gem,
        BlockMaterial::Grass,
        BlockMaterial::Water,
    ];

    /// Decode a byte code, `None` for codes outside the catalog
    pub fn from_u8(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| *m as u8 == code)
    }

    /// True for air
    #[inline]
    pub fn is_empty(self) -> bool {
        self == BlockMaterial::None
    }

    /// True for anything that is not air
    #[inline]
    pub fn is_solid(self) -> bool {
        !self.is_empty()
    }

    /// Rank used by texture blending when two materials meet; higher wins.
    pub fn overlap_priority(self) -> u8 {
        match self {
            BlockMaterial::Clay => 1,
            BlockMaterial::Sand => 2,
            BlockMaterial::Soil => 3,
            BlockMaterial::Grass => 20,
            _ => 0,
        }
    }

    /// Material that is drawn over the other at a shared boundary.
    /// Equal priorities keep `a`.
    pub fn overlap_winner(a: BlockMaterial, b: BlockMaterial) -> BlockMaterial {
        if b.overlap_priority() > a.overlap_priority() { b } else { a }
    }
}
