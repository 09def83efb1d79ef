use serde::{Deserialize, Serialize};
use crate::math::Vec3;

/// Complete YAML scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub tree: TreeLayout,
    #[serde(default)]
    pub foliage: FoliageConfig,
    #[serde(default = "default_ornament_groups")]
    pub ornaments: Vec<OrnamentGroupConfig>,
    #[serde(default)]
    pub star: StarConfig,
}

/// Shared cone and scatter-shell dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeLayout {
    pub height: f32,
    pub base_radius: f32,
    /// Inner radius of the scattered resting shell
    pub scatter_min_radius: f32,
    /// Radial thickness of the shell
    pub scatter_spread: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoliageConfig {
    pub count: usize,
    /// Point size in CSS pixels before density and depth scaling
    pub base_size: f32,
}

/// Ornament geometry tag; the mesh choice is presentation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrnamentShape {
    Cube,
    Sphere,
    Octahedron,
}

/// One instanced ornament group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrnamentGroupConfig {
    pub name: String,
    pub shape: OrnamentShape,
    pub count: usize,
    pub base_scale: f32,
    pub color: Vec3,
    #[serde(default)]
    pub emissive: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StarConfig {
    /// Extra height above the cone apex when assembled
    pub height_offset: f32,
    /// Base altitude while scattered (bobbing is added on top)
    pub scatter_altitude: f32,
    pub base_scale: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            height: 11.0,
            base_radius: 4.5,
            scatter_min_radius: 9.0,
            scatter_spread: 6.0,
        }
    }
}

impl Default for FoliageConfig {
    fn default() -> Self {
        Self {
            count: 14_000,
            base_size: 9.0,
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.5,
            scatter_altitude: 9.5,
            base_scale: 0.8,
        }
    }
}

fn default_ornament_groups() -> Vec<OrnamentGroupConfig> {
    vec![
        OrnamentGroupConfig {
            name: "baubles".to_string(),
            shape: OrnamentShape::Sphere,
            count: 180,
            base_scale: 0.22,
            color: Vec3::new(0.90, 0.18, 0.24),
            emissive: false,
        },
        OrnamentGroupConfig {
            name: "gifts".to_string(),
            shape: OrnamentShape::Cube,
            count: 90,
            base_scale: 0.30,
            color: Vec3::new(0.95, 0.76, 0.30),
            emissive: false,
        },
        OrnamentGroupConfig {
            name: "lights".to_string(),
            shape: OrnamentShape::Octahedron,
            count: 140,
            base_scale: 0.16,
            color: Vec3::new(1.0, 0.92, 0.70),
            emissive: true,
        },
    ]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tree: TreeLayout::default(),
            foliage: FoliageConfig::default(),
            ornaments: default_ornament_groups(),
            star: StarConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: SceneConfig = serde_yaml::from_str(yaml)
            .map_err(|e| format!("YAML parse error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject dimensions the fields would assert on
    pub fn validate(&self) -> Result<(), String> {
        check_positive("tree.height", self.tree.height)?;
        check_positive("tree.base_radius", self.tree.base_radius)?;
        check_positive("tree.scatter_min_radius", self.tree.scatter_min_radius)?;
        check_non_negative("tree.scatter_spread", self.tree.scatter_spread)?;
        check_positive("foliage.base_size", self.foliage.base_size)?;
        check_positive("star.base_scale", self.star.base_scale)?;
        if !self.star.height_offset.is_finite() || !self.star.scatter_altitude.is_finite() {
            return Err("star altitudes must be finite".to_string());
        }

        for group in &self.ornaments {
            if group.name.is_empty() {
                return Err("ornament group with empty name".to_string());
            }
            check_positive(&format!("ornaments.{}.base_scale", group.name), group.base_scale)?;
            if !group.color.is_finite() {
                return Err(format!("ornaments.{}: color must be finite", group.name));
            }
        }

        // Duplicate names would make log output and debugging ambiguous
        for (i, group) in self.ornaments.iter().enumerate() {
            if self.ornaments[..i].iter().any(|g| g.name == group.name) {
                return Err(format!("duplicate ornament group name '{}'", group.name));
            }
        }

        Ok(())
    }

    /// Total animated element count across all fields (plus the star)
    pub fn element_count(&self) -> usize {
        self.foliage.count + self.ornaments.iter().map(|g| g.count).sum::<usize>() + 1
    }
}

fn check_positive(field: &str, value: f32) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be finite and positive, got {}", field, value));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f32) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be finite and non-negative, got {}", field, value));
    }
    Ok(())
}
