//! Land-cover classes and raster sampling
//!
//! Classes follow the NLCD legend. Rasters fetched from the MRLC WMS come
//! back paletted, so pixel values may be palette indices rather than class
//! codes; [`PixelEncoding`] tells the sampler which one it holds.

use geo::Rect;

/// NLCD land-cover class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NlcdClass {
    OpenWater,
    PerennialIceSnow,
    DevelopedOpenSpace,
    DevelopedLowIntensity,
    DevelopedMediumIntensity,
    DevelopedHighIntensity,
    BarrenLand,
    DeciduousForest,
    EvergreenForest,
    MixedForest,
    ShrubScrub,
    GrasslandHerbaceous,
    PastureHay,
    CultivatedCrops,
    WoodyWetlands,
    EmergentHerbaceousWetlands,
}

impl NlcdClass {
    /// Palette order of the MRLC `NLCD_2021_Land_Cover_L48` layer, index 1 onward
    const PALETTE: [NlcdClass; 16] = [
        NlcdClass::OpenWater,
        NlcdClass::PerennialIceSnow,
        NlcdClass::DevelopedOpenSpace,
        NlcdClass::DevelopedLowIntensity,
        NlcdClass::DevelopedMediumIntensity,
        NlcdClass::DevelopedHighIntensity,
        NlcdClass::BarrenLand,
        NlcdClass::DeciduousForest,
        NlcdClass::EvergreenForest,
        NlcdClass::MixedForest,
        NlcdClass::ShrubScrub,
        NlcdClass::GrasslandHerbaceous,
        NlcdClass::PastureHay,
        NlcdClass::CultivatedCrops,
        NlcdClass::WoodyWetlands,
        NlcdClass::EmergentHerbaceousWetlands,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::PALETTE.into_iter().find(|class| class.code() == code)
    }

    /// Maps a WMS palette index to its class; index 0 is "no data"
    pub fn from_palette_index(index: u8) -> Option<Self> {
        let position = usize::from(index).checked_sub(1)?;
        Self::PALETTE.get(position).copied()
    }

    pub fn code(self) -> u8 {
        match self {
            NlcdClass::OpenWater => 11,
            NlcdClass::PerennialIceSnow => 12,
            NlcdClass::DevelopedOpenSpace => 21,
            NlcdClass::DevelopedLowIntensity => 22,
            NlcdClass::DevelopedMediumIntensity => 23,
            NlcdClass::DevelopedHighIntensity => 24,
            NlcdClass::BarrenLand => 31,
            NlcdClass::DeciduousForest => 41,
            NlcdClass::EvergreenForest => 42,
            NlcdClass::MixedForest => 43,
            NlcdClass::ShrubScrub => 52,
            NlcdClass::GrasslandHerbaceous => 71,
            NlcdClass::PastureHay => 81,
            NlcdClass::CultivatedCrops => 82,
            NlcdClass::WoodyWetlands => 90,
            NlcdClass::EmergentHerbaceousWetlands => 95,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NlcdClass::OpenWater => "Open Water",
            NlcdClass::PerennialIceSnow => "Snow/Ice",
            NlcdClass::DevelopedOpenSpace => "Developed Open",
            NlcdClass::DevelopedLowIntensity => "Developed Low",
            NlcdClass::DevelopedMediumIntensity => "Developed Medium",
            NlcdClass::DevelopedHighIntensity => "Developed High",
            NlcdClass::BarrenLand => "Barren",
            NlcdClass::DeciduousForest => "Deciduous Forest",
            NlcdClass::EvergreenForest => "Evergreen Forest",
            NlcdClass::MixedForest => "Mixed Forest",
            NlcdClass::ShrubScrub => "Shrub/Scrub",
            NlcdClass::GrasslandHerbaceous => "Grassland",
            NlcdClass::PastureHay => "Pasture/Hay",
            NlcdClass::CultivatedCrops => "Cultivated Crops",
            NlcdClass::WoodyWetlands => "Woody Wetlands",
            NlcdClass::EmergentHerbaceousWetlands => "Emergent Wetlands",
        }
    }

    /// Three-tier risk: forests and wetlands have no ambient light and poor
    /// sightlines, built-up areas and open water are the safest surroundings.
    pub fn risk(self) -> f64 {
        match self {
            NlcdClass::DeciduousForest
            | NlcdClass::EvergreenForest
            | NlcdClass::MixedForest
            | NlcdClass::WoodyWetlands
            | NlcdClass::EmergentHerbaceousWetlands => 1.0,
            NlcdClass::ShrubScrub
            | NlcdClass::GrasslandHerbaceous
            | NlcdClass::PastureHay
            | NlcdClass::CultivatedCrops
            | NlcdClass::BarrenLand
            | NlcdClass::DevelopedOpenSpace => 0.6,
            NlcdClass::DevelopedLowIntensity
            | NlcdClass::DevelopedMediumIntensity
            | NlcdClass::DevelopedHighIntensity
            | NlcdClass::OpenWater
            | NlcdClass::PerennialIceSnow => 0.2,
        }
    }
}

/// Point-sampling interface over a land-cover dataset
pub trait LandCoverSource: Sync {
    /// Class at `(lon, lat)`, or `None` outside coverage / for unmapped values
    fn sample_class(&self, lon: f64, lat: f64) -> Option<NlcdClass>;

    /// `false` when the dataset could not be obtained at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Placeholder for a land-cover dataset that could not be fetched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLandCover;

impl LandCoverSource for NoLandCover {
    fn sample_class(&self, _lon: f64, _lat: f64) -> Option<NlcdClass> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// What the pixel values of a [`LandCoverRaster`] mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelEncoding {
    /// WMS palette indices
    #[default]
    Palette,
    /// Raw NLCD class codes
    ClassCode,
}

/// Single-band raster in lon/lat covering `bounds`, row 0 at the north edge
#[derive(Debug, Clone)]
pub struct LandCoverRaster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    bounds: Rect<f64>,
    encoding: PixelEncoding,
}

impl LandCoverRaster {
    /// Wraps row-major pixels
    ///
    /// # Errors
    ///
    /// Returns a description if the pixel buffer does not match the
    /// dimensions or the raster is empty.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<u8>,
        bounds: Rect<f64>,
        encoding: PixelEncoding,
    ) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err("land cover raster has no pixels".to_string());
        }
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(format!(
                "land cover raster expects {width}x{height} pixels, got {}",
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
            bounds,
            encoding,
        })
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    fn pixel_at(&self, lon: f64, lat: f64) -> Option<u8> {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        if lon < min.x || lon > max.x || lat < min.y || lat > max.y {
            return None;
        }

        let x_frac = if max.x > min.x {
            (lon - min.x) / (max.x - min.x)
        } else {
            0.0
        };
        let y_frac = if max.y > min.y {
            (max.y - lat) / (max.y - min.y)
        } else {
            0.0
        };

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let (column, row) = (
            (x_frac * (self.width - 1) as f64) as usize,
            (y_frac * (self.height - 1) as f64) as usize,
        );
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels.get(row * self.width + column).copied()
    }
}

impl LandCoverSource for LandCoverRaster {
    fn sample_class(&self, lon: f64, lat: f64) -> Option<NlcdClass> {
        let value = self.pixel_at(lon, lat)?;
        match self.encoding {
            PixelEncoding::Palette => NlcdClass::from_palette_index(value),
            PixelEncoding::ClassCode => NlcdClass::from_code(value),
        }
    }
}
