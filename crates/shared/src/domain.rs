use serde::{Deserialize, Serialize};

pub const FULL_ROTATION: f64 = 360.0;
pub const SECTOR_COUNT: usize = 7;
/// Screen angle of the static indicator. The winning window ends here.
pub const INDICATOR_ANGLE: f64 = 270.0;

/// Wraps any angle into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_ROTATION);
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if wrapped >= FULL_ROTATION {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorColor {
    Red,
    Orange,
    Yellow,
    Green,
    LightBlue,
    DarkBlue,
    Violet,
}

impl SectorColor {
    pub const ALL: [SectorColor; SECTOR_COUNT] = [
        SectorColor::Red,
        SectorColor::Orange,
        SectorColor::Yellow,
        SectorColor::Green,
        SectorColor::LightBlue,
        SectorColor::DarkBlue,
        SectorColor::Violet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectorColor::Red => "RED",
            SectorColor::Orange => "ORANGE",
            SectorColor::Yellow => "YELLOW",
            SectorColor::Green => "GREEN",
            SectorColor::LightBlue => "LIGHT BLUE",
            SectorColor::DarkBlue => "DARK BLUE",
            SectorColor::Violet => "VIOLET",
        }
    }

    /// Fill color as `0xRRGGBB`.
    pub fn rgb(self) -> u32 {
        match self {
            SectorColor::Red => 0xE5_39_35,
            SectorColor::Orange => 0xFB_8C_00,
            SectorColor::Yellow => 0xFD_D8_35,
            SectorColor::Green => 0x43_A0_47,
            SectorColor::LightBlue => 0x4F_C3_F7,
            SectorColor::DarkBlue => 0x1E_3A_8A,
            SectorColor::Violet => 0x8E_24_AA,
        }
    }

    pub fn result_kind(self) -> ResultKind {
        match self {
            SectorColor::Red | SectorColor::Yellow | SectorColor::LightBlue | SectorColor::Violet => {
                ResultKind::Text
            }
            SectorColor::Orange | SectorColor::Green | SectorColor::DarkBlue => ResultKind::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sector {
    pub color: SectorColor,
    pub display_text: &'static str,
    pub result_kind: ResultKind,
}

impl Sector {
    const fn new(color: SectorColor, display_text: &'static str, result_kind: ResultKind) -> Self {
        Self {
            color,
            display_text,
            result_kind,
        }
    }
}

static STANDARD_SECTORS: [Sector; SECTOR_COUNT] = [
    Sector::new(SectorColor::Red, "RED", ResultKind::Text),
    Sector::new(SectorColor::Orange, "ORANGE", ResultKind::Image),
    Sector::new(SectorColor::Yellow, "YELLOW", ResultKind::Text),
    Sector::new(SectorColor::Green, "GREEN", ResultKind::Image),
    Sector::new(SectorColor::LightBlue, "LIGHT BLUE", ResultKind::Text),
    Sector::new(SectorColor::DarkBlue, "DARK BLUE", ResultKind::Image),
    Sector::new(SectorColor::Violet, "VIOLET", ResultKind::Text),
];

/// One sector placed on the wheel for a given rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorArc {
    pub sector: &'static Sector,
    pub start: f64,
    pub sweep: f64,
}

/// The fixed, ordered set of wheel sectors.
#[derive(Debug, Clone, Copy)]
pub struct SectorTable {
    sectors: &'static [Sector; SECTOR_COUNT],
}

impl Default for SectorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl SectorTable {
    pub fn standard() -> Self {
        Self {
            sectors: &STANDARD_SECTORS,
        }
    }

    pub fn sector_width(&self) -> f64 {
        FULL_ROTATION / self.sectors.len() as f64
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Sector> {
        let sectors: &'static [Sector; SECTOR_COUNT] = self.sectors;
        sectors.iter()
    }

    pub fn get(&self, color: SectorColor) -> &'static Sector {
        let sectors: &'static [Sector; SECTOR_COUNT] = self.sectors;
        sectors
            .iter()
            .find(|sector| sector.color == color)
            .unwrap_or(&sectors[0])
    }

    /// Sectors in drawing order, laid out contiguously from `start_angle`.
    pub fn arcs(&self, start_angle: f64) -> impl Iterator<Item = SectorArc> {
        let sweep = self.sector_width();
        let sectors: &'static [Sector; SECTOR_COUNT] = self.sectors;
        sectors
            .iter()
            .enumerate()
            .map(move |(index, sector)| SectorArc {
                sector,
                start: normalize_angle(start_angle + index as f64 * sweep),
                sweep,
            })
    }

    /// The sector whose wrapped start angle falls in
    /// `[INDICATOR_ANGLE - width, INDICATOR_ANGLE)`, i.e. the sector under the indicator.
    pub fn sector_at(&self, start_angle: f64) -> Option<&'static Sector> {
        let window_end = INDICATOR_ANGLE;
        let window_start = INDICATOR_ANGLE - self.sector_width();
        self.arcs(start_angle)
            .find(|arc| arc.start >= window_start && arc.start < window_end)
            .map(|arc| arc.sector)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
