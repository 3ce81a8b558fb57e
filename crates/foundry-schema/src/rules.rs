//! Cross-field business rules
//!
//! Rules run after structural checks, in declaration order, and only see
//! fields that parsed structurally ([`Facts`]). A rule whose inputs are
//! missing simply does not fire. Rules add findings; they never remove one.

use std::collections::HashMap;

use crate::result::ValidationIssue;
use crate::variant::Variant;

/// Blocking or advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks generation
    Error,
    /// Reported, does not block
    Warning,
}

/// A structurally valid field value
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Fact {
    Text(String),
    Number(f64),
}

/// Field values that passed structural checks, keyed by dotted path
#[derive(Debug, Clone, Default)]
pub struct Facts {
    values: HashMap<String, Fact>,
}

impl Facts {
    pub(crate) fn record(&mut self, path: String, fact: Fact) {
        self.values.insert(path, fact);
    }

    /// Enum or const value at `path`
    #[must_use]
    pub fn text(&self, path: &str) -> Option<&str> {
        match self.values.get(path)? {
            Fact::Text(text) => Some(text),
            Fact::Number(_) => None,
        }
    }

    /// Numeric value at `path`
    #[must_use]
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.values.get(path)? {
            Fact::Number(value) => Some(*value),
            Fact::Text(_) => None,
        }
    }

    fn is(&self, path: &str, expected: &str) -> bool {
        self.text(path) == Some(expected)
    }

    fn is_any(&self, path: &str, expected: &[&str]) -> bool {
        self.text(path).is_some_and(|v| expected.contains(&v))
    }
}

/// One cross-field rule
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable identifier
    pub id: &'static str,
    /// Variant the rule applies to
    pub variant: Variant,
    /// Finding severity
    pub severity: Severity,
    /// Field the finding is reported at
    pub path: &'static str,
    check: fn(&Facts) -> Option<String>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("variant", &self.variant)
            .field("severity", &self.severity)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Run the rule; `None` when it does not fire
    #[must_use]
    pub fn evaluate(&self, facts: &Facts) -> Option<ValidationIssue> {
        (self.check)(facts).map(|message| ValidationIssue::new(self.path, message))
    }
}

/// Rules for `variant`, in evaluation order
pub fn rules_for(variant: Variant) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.variant == variant)
}

/// Expected ornamentation band per rarity tier
#[must_use]
pub fn ornamentation_band(rarity: &str) -> Option<(f64, f64)> {
    match rarity {
        "common" => Some((0.0, 0.6)),
        "uncommon" => Some((0.2, 0.8)),
        "rare" => Some((0.4, 1.0)),
        "epic" => Some((0.6, 1.0)),
        "legendary" | "artifact" => Some((0.8, 1.0)),
        "unique" => Some((0.7, 1.0)),
        _ => None,
    }
}

/// Highest plausible emissive glow per rarity tier
#[must_use]
pub fn glow_ceiling(rarity: &str) -> Option<f64> {
    match rarity {
        "common" => Some(0.2),
        "uncommon" => Some(0.4),
        "rare" => Some(0.6),
        "epic" => Some(0.8),
        "legendary" | "artifact" => Some(1.0),
        "unique" => Some(0.9),
        _ => None,
    }
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const fn rule(
    id: &'static str,
    variant: Variant,
    severity: Severity,
    path: &'static str,
    check: fn(&Facts) -> Option<String>,
) -> Rule {
    Rule {
        id,
        variant,
        severity,
        path,
        check,
    }
}

fn when(condition: bool, message: &str) -> Option<String> {
    condition.then(|| message.to_string())
}

use Severity::{Error, Warning};
use Variant::{EnvironmentConcept as Env, NpcPortrait as Npc, WeaponItem as Weapon};

static RULES: &[Rule] = &[
    // Weapon
    rule("crystal_rust", Weapon, Error, "surface.patina", |f| {
        when(
            f.is("item.material", "crystal") && f.is("surface.patina", "rust"),
            "Crystal materials cannot have rust patina",
        )
    }),
    rule("wood_metallic_patina", Weapon, Error, "surface.patina", |f| {
        when(
            f.is("item.material", "wood") && f.is_any("surface.patina", &["rust", "verdigris"]),
            "Wood materials cannot have metallic patina",
        )
    }),
    rule("rarity_ornamentation", Weapon, Warning, "form.ornamentation", |f| {
        let rarity = f.text("item.rarity")?;
        let ornamentation = f.number("form.ornamentation")?;
        let (floor, ceiling) = ornamentation_band(rarity)?;
        if ornamentation < floor {
            Some(format!(
                "{} items typically have ornamentation >= {floor}",
                title(rarity)
            ))
        } else if ornamentation > ceiling {
            Some(format!(
                "{} items typically have ornamentation <= {ceiling}",
                title(rarity)
            ))
        } else {
            None
        }
    }),
    rule("wood_glow", Weapon, Warning, "surface.emissiveGlow", |f| {
        when(
            f.is("item.material", "wood") && f.number("surface.emissiveGlow")? > 0.5,
            "High emissive glow on wood materials may need magical justification",
        )
    }),
    rule("crystal_verdigris", Weapon, Warning, "surface.patina", |f| {
        when(
            f.is("item.material", "crystal") && f.is("surface.patina", "verdigris"),
            "Crystal materials don't typically have metallic patina",
        )
    }),
    rule("flat_icon_background", Weapon, Warning, "background.type", |f| {
        when(
            f.is("camera.mode", "flat_icon")
                && f.is_any("background.type", &["radial_glow", "gradient"]),
            "Flat icon mode works best with transparent or solid backgrounds",
        )
    }),
    rule("rarity_glow", Weapon, Warning, "surface.emissiveGlow", |f| {
        let rarity = f.text("item.rarity")?;
        let ceiling = glow_ceiling(rarity)?;
        (f.number("surface.emissiveGlow")? > ceiling).then(|| {
            format!(
                "{} items rarely have emissive glow > {ceiling}",
                title(rarity)
            )
        })
    }),
    // Environment
    rule("desert_precipitation", Env, Error, "atmosphere.weather", |f| {
        when(
            f.is("scene.biome", "desert") && f.is_any("atmosphere.weather", &["rainy", "snowy"]),
            "Desert biomes cannot have rain or snow weather",
        )
    }),
    rule("arctic_sandstorm", Env, Error, "atmosphere.weather", |f| {
        when(
            f.is("scene.biome", "arctic") && f.is("atmosphere.weather", "sandstorm"),
            "Arctic biomes cannot have sandstorms",
        )
    }),
    rule("god_rays_need_fog", Env, Warning, "lighting.godRays", |f| {
        when(
            f.number("lighting.godRays")? > 0.5 && f.number("atmosphere.fogDensity")? < 0.2,
            "God rays are most visible with atmospheric fog or particles",
        )
    }),
    rule("epic_scale_ground_camera", Env, Warning, "composition.cameraHeight", |f| {
        when(
            f.is("scene.scale", "epic") && f.is("composition.cameraHeight", "ground"),
            "Epic scale scenes work better with elevated camera positions",
        )
    }),
    rule("night_natural_light", Env, Warning, "lighting.lightStyle", |f| {
        when(
            f.is_any("atmosphere.timeOfDay", &["night", "midnight"])
                && f.is("lighting.lightStyle", "natural"),
            "Natural lighting at night may be very dark",
        )
    }),
    rule("desert_fog", Env, Warning, "atmosphere.weather", |f| {
        when(
            f.is("scene.biome", "desert") && f.is("atmosphere.weather", "foggy"),
            "Fog is unusual in desert biomes",
        )
    }),
    rule("horizon_thirds", Env, Warning, "composition.horizonPosition", |f| {
        let horizon = f.number("composition.horizonPosition")?;
        when(
            !((0.28..=0.38).contains(&horizon) || (0.62..=0.72).contains(&horizon)),
            "Consider placing horizon at rule of thirds (33% or 66%) for dynamic composition",
        )
    }),
    rule("fog_visibility", Env, Warning, "atmosphere.visibility", |f| {
        when(
            f.number("atmosphere.fogDensity")? > 0.7 && f.number("atmosphere.visibility")? > 0.5,
            "High fog density typically reduces visibility",
        )
    }),
    // NPC portrait
    rule("young_full_beard", Npc, Warning, "facialFeatures.facialHair", |f| {
        when(
            f.is("identity.ageRange", "young")
                && f.is_any("facialFeatures.facialHair", &["beard", "full"]),
            "Young characters rarely have full beards",
        )
    }),
    rule("wide_jaw_low_cheekbones", Npc, Warning, "facialFeatures.jawWidth", |f| {
        when(
            f.number("facialFeatures.jawWidth")? > 0.9
                && f.number("facialFeatures.cheekboneHeight")? < 0.2,
            "Very wide jaw with low cheekbones may look unnatural",
        )
    }),
    rule("wide_lens_close", Npc, Warning, "camera.fov", |f| {
        when(
            f.number("camera.fov")? < 40.0 && f.is("camera.distance", "close"),
            "Wide angle lens with close distance may distort facial features",
        )
    }),
    rule("extreme_head_tilt", Npc, Warning, "camera.headTilt", |f| {
        when(
            f.number("camera.headTilt")?.abs() > 0.2,
            "Extreme head tilt may cause composition issues",
        )
    }),
    rule("neutral_high_intensity", Npc, Warning, "expression.intensity", |f| {
        when(
            f.is("expression.emotion", "neutral") && f.number("expression.intensity")? > 0.7,
            "High intensity with neutral emotion may look unnatural",
        )
    }),
];
