//! Field tables for every variant
//!
//! Enum members are the lower-case wire values; defaults match the
//! stock configuration handed out for a freshly selected variant.

use crate::field::{float, integer, text, FieldDefault, FieldKind, FieldSpec};
use crate::variant::Variant;

/// Only supported schema version
pub const SCHEMA_VERSION: &str = "v1";

/// Inclusive seed bounds
pub const SEED_MIN: i64 = 1;
pub const SEED_MAX: i64 = 999_999_999;

// Output
pub const RESOLUTIONS: &[&str] = &["512x512", "1024x1024", "1920x1080", "2048x2048"];
pub const COLOR_DEPTHS: &[&str] = &["8bit", "16bit", "32bit"];
pub const OUTPUT_FORMATS: &[&str] = &["png", "jpg", "webp", "exr"];
pub const OUTPUT_BACKGROUNDS: &[&str] = &["transparent", "solid", "gradient", "studio_gray"];

// Shared camera distance
pub const CAMERA_DISTANCES: &[&str] = &["close", "medium", "far"];

// NPC portrait
pub const AGE_RANGES: &[&str] = &["young", "adult", "middle_aged", "elderly"];
pub const GENDER_PRESENTATIONS: &[&str] = &["masculine", "feminine", "androgynous"];
pub const ETHNICITIES: &[&str] = &[
    "east_asian",
    "south_asian",
    "african",
    "caucasian",
    "middle_eastern",
    "latino",
    "mixed",
    "fantasy_elf",
    "fantasy_dwarf",
    "fantasy_orc",
];
pub const ARCHETYPES: &[&str] = &[
    "warrior",
    "mage",
    "rogue",
    "noble",
    "merchant",
    "scholar",
    "assassin",
    "paladin",
    "villager",
    "blacksmith",
];
pub const SCARS: &[&str] = &["none", "light", "heavy", "ritual", "battle"];
pub const FACIAL_HAIR: &[&str] = &["none", "stubble", "beard", "mustache", "goatee", "full"];
pub const EMOTIONS: &[&str] = &[
    "neutral",
    "stern",
    "friendly",
    "angry",
    "mysterious",
    "wise",
    "fierce",
    "sad",
    "determined",
];
pub const PORTRAIT_ANGLES: &[&str] = &[
    "frontal",
    "three_quarter_left",
    "three_quarter_right",
    "profile_left",
    "profile_right",
];
pub const PORTRAIT_KEY_LIGHTS: &[&str] = &["soft", "dramatic", "studio", "natural"];
pub const PORTRAIT_RIM_LIGHTS: &[&str] = &["none", "subtle", "strong"];
pub const PORTRAIT_COLOR_TEMPERATURES: &[&str] =
    &["warm", "neutral", "cool", "candlelight", "daylight", "moonlight"];
pub const PORTRAIT_RENDER_STYLES: &[&str] =
    &["photorealistic", "stylized", "painterly", "cel_shaded", "concept_art"];
pub const PORTRAIT_DETAIL_LEVELS: &[&str] = &["low", "medium", "high", "ultra"];
pub const SKIN_TEXTURES: &[&str] = &["smooth", "natural", "rough", "weathered", "fantasy"];

// Weapon item
pub const ITEM_CATEGORIES: &[&str] = &[
    "sword",
    "axe",
    "bow",
    "staff",
    "dagger",
    "hammer",
    "gun",
    "potion",
    "artifact",
    "shield",
    "armor",
    "accessory",
];
pub const RARITIES: &[&str] = &[
    "common",
    "uncommon",
    "rare",
    "epic",
    "legendary",
    "artifact",
    "unique",
];
pub const MATERIALS: &[&str] = &[
    "steel",
    "iron",
    "bronze",
    "silver",
    "gold",
    "crystal",
    "wood",
    "bone",
    "obsidian",
    "mithril",
    "adamantine",
    "ethereal",
];
pub const STYLE_THEMES: &[&str] = &[
    "fantasy",
    "sci_fi",
    "modern",
    "steampunk",
    "medieval",
    "ancient",
    "tribal",
    "elven",
    "dwarven",
    "orcish",
];
pub const SYMMETRIES: &[&str] = &["symmetrical", "asymmetrical", "curved", "twisted"];
pub const SCRATCHES: &[&str] = &["none", "light", "heavy", "battle_worn", "ritual"];
pub const PATINAS: &[&str] = &["none", "light", "heavy", "verdigris", "rust", "tarnish"];
pub const INSCRIPTIONS: &[&str] = &["none", "runes", "text", "symbols", "geometric"];
pub const CAMERA_MODES: &[&str] =
    &["isometric", "flat_icon", "hero_render", "three_quarter", "profile"];
pub const ITEM_KEY_LIGHTS: &[&str] = &["studio", "dramatic", "soft", "harsh", "ambient"];
pub const ITEM_RIM_LIGHTS: &[&str] = &["none", "subtle", "strong", "colored"];
pub const BACKGROUND_STYLES: &[&str] =
    &["transparent", "studio_gray", "radial_glow", "solid_color", "gradient"];
pub const SHADOWS: &[&str] = &["none", "drop_shadow", "contact_shadow", "ambient_occlusion"];
pub const PARTICLES: &[&str] = &["none", "dust", "sparks", "magic", "smoke"];

// Environment concept
pub const SCENE_TYPES: &[&str] = &[
    "city",
    "village",
    "forest",
    "desert",
    "mountains",
    "ruins",
    "dungeon",
    "castle",
    "temple",
    "sci_fi_interior",
    "space_station",
    "underwater",
];
pub const ERAS: &[&str] = &[
    "prehistoric",
    "ancient",
    "medieval",
    "renaissance",
    "industrial",
    "modern",
    "futuristic",
    "post_apocalyptic",
];
pub const SCALES: &[&str] = &["intimate", "medium", "wide", "epic", "panoramic"];
pub const BIOMES: &[&str] = &[
    "temperate",
    "tropical",
    "arctic",
    "desert",
    "swamp",
    "volcanic",
    "alien",
    "magical",
];
pub const CAMERA_HEIGHTS: &[&str] = &["ground", "eye_level", "elevated", "aerial", "birds_eye"];
pub const DEPTH_LAYERS: &[&str] = &["shallow", "medium", "deep", "infinite"];
pub const FOCAL_POINTS: &[&str] =
    &["center", "left_third", "right_third", "foreground", "background"];
pub const TIMES_OF_DAY: &[&str] =
    &["dawn", "morning", "midday", "afternoon", "dusk", "night", "midnight"];
pub const WEATHER: &[&str] = &[
    "clear",
    "partly_cloudy",
    "overcast",
    "foggy",
    "rainy",
    "stormy",
    "snowy",
    "sandstorm",
];
pub const SCENE_LIGHT_STYLES: &[&str] =
    &["soft", "dramatic", "cinematic", "natural", "artificial", "magical"];
pub const SCENE_COLOR_TEMPERATURES: &[&str] =
    &["warm", "neutral", "cool", "golden_hour", "blue_hour", "artificial"];
pub const SCENE_RENDER_STYLES: &[&str] = &[
    "photorealistic",
    "cinematic_realism",
    "matte_painting",
    "stylized",
    "concept_art",
    "impressionistic",
];
pub const SCENE_DETAIL_LEVELS: &[&str] = &["sketch", "medium", "high", "ultra", "architectural"];
pub const COLOR_PALETTES: &[&str] = &[
    "natural",
    "desaturated",
    "vibrant",
    "monochrome",
    "complementary",
    "analogous",
    "cinematic",
];

/// Fields every variant declares
pub(crate) fn base_fields(variant: Variant) -> [FieldSpec; 7] {
    let resolution = match variant {
        Variant::EnvironmentConcept => "1920x1080",
        Variant::NpcPortrait | Variant::WeaponItem => "1024x1024",
    };
    [
        FieldSpec::new(
            &["schemaVersion"],
            FieldKind::Const(SCHEMA_VERSION),
            FieldDefault::Text(SCHEMA_VERSION),
        ),
        FieldSpec::new(
            &["assetType"],
            FieldKind::Const(variant.as_str()),
            FieldDefault::Text(variant.as_str()),
        ),
        FieldSpec::new(
            &["seed"],
            FieldKind::Integer {
                min: SEED_MIN,
                max: SEED_MAX,
            },
            FieldDefault::Seed,
        ),
        text(&["output", "resolution"], RESOLUTIONS, resolution),
        text(&["output", "colorDepth"], COLOR_DEPTHS, "16bit"),
        text(&["output", "format"], OUTPUT_FORMATS, "png"),
        text(&["output", "background"], OUTPUT_BACKGROUNDS, "transparent"),
    ]
}

pub(crate) const NPC_PORTRAIT: &[FieldSpec] = &[
    text(&["identity", "ageRange"], AGE_RANGES, "adult"),
    text(&["identity", "genderPresentation"], GENDER_PRESENTATIONS, "masculine"),
    text(&["identity", "ethnicity"], ETHNICITIES, "caucasian"),
    text(&["identity", "archetype"], ARCHETYPES, "warrior"),
    float(&["facialFeatures", "jawWidth"], 0.0, 1.0, 0.5),
    float(&["facialFeatures", "cheekboneHeight"], 0.0, 1.0, 0.5),
    float(&["facialFeatures", "noseLength"], 0.0, 1.0, 0.5),
    float(&["facialFeatures", "eyeSize"], 0.0, 1.0, 0.5),
    float(&["facialFeatures", "browIntensity"], 0.0, 1.0, 0.5),
    text(&["facialFeatures", "scars"], SCARS, "none"),
    text(&["facialFeatures", "facialHair"], FACIAL_HAIR, "none"),
    text(&["expression", "emotion"], EMOTIONS, "neutral"),
    float(&["expression", "intensity"], 0.0, 1.0, 0.4),
    text(&["camera", "angle"], PORTRAIT_ANGLES, "three_quarter_left"),
    integer(&["camera", "fov"], 35, 85, 50),
    float(&["camera", "headTilt"], -0.3, 0.3, 0.0),
    text(&["camera", "distance"], CAMERA_DISTANCES, "medium"),
    text(&["lighting", "keyLight"], PORTRAIT_KEY_LIGHTS, "studio"),
    float(&["lighting", "fillRatio"], 0.0, 1.0, 0.4),
    text(&["lighting", "rimLight"], PORTRAIT_RIM_LIGHTS, "subtle"),
    text(&["lighting", "colorTemperature"], PORTRAIT_COLOR_TEMPERATURES, "neutral"),
    text(&["style", "renderStyle"], PORTRAIT_RENDER_STYLES, "photorealistic"),
    text(&["style", "detailLevel"], PORTRAIT_DETAIL_LEVELS, "high"),
    text(&["style", "skinTexture"], SKIN_TEXTURES, "natural"),
];

pub(crate) const WEAPON_ITEM: &[FieldSpec] = &[
    text(&["item", "category"], ITEM_CATEGORIES, "sword"),
    text(&["item", "rarity"], RARITIES, "common"),
    text(&["item", "material"], MATERIALS, "steel"),
    text(&["item", "styleTheme"], STYLE_THEMES, "fantasy"),
    float(&["form", "length"], 0.1, 1.0, 0.6),
    float(&["form", "thickness"], 0.1, 1.0, 0.4),
    text(&["form", "symmetry"], SYMMETRIES, "symmetrical"),
    float(&["form", "ornamentation"], 0.0, 1.0, 0.5),
    float(&["surface", "wearLevel"], 0.0, 1.0, 0.3),
    text(&["surface", "scratches"], SCRATCHES, "light"),
    float(&["surface", "emissiveGlow"], 0.0, 1.0, 0.2),
    text(&["surface", "patina"], PATINAS, "none"),
    text(&["surface", "inscriptions"], INSCRIPTIONS, "none"),
    text(&["camera", "mode"], CAMERA_MODES, "hero_render"),
    integer(&["camera", "angle"], 0, 360, 315),
    integer(&["camera", "fov"], 25, 75, 45),
    text(&["camera", "distance"], CAMERA_DISTANCES, "medium"),
    text(&["lighting", "keyLight"], ITEM_KEY_LIGHTS, "dramatic"),
    float(&["lighting", "contrast"], 0.0, 1.0, 0.6),
    text(&["lighting", "rimLight"], ITEM_RIM_LIGHTS, "strong"),
    float(&["lighting", "reflections"], 0.0, 1.0, 0.9),
    text(&["background", "type"], BACKGROUND_STYLES, "radial_glow"),
    text(&["background", "shadow"], SHADOWS, "drop_shadow"),
    text(&["background", "particles"], PARTICLES, "magic"),
];

pub(crate) const ENVIRONMENT_CONCEPT: &[FieldSpec] = &[
    text(&["scene", "type"], SCENE_TYPES, "forest"),
    text(&["scene", "era"], ERAS, "medieval"),
    text(&["scene", "scale"], SCALES, "medium"),
    text(&["scene", "biome"], BIOMES, "temperate"),
    text(&["composition", "cameraHeight"], CAMERA_HEIGHTS, "eye_level"),
    float(&["composition", "horizonPosition"], 0.0, 1.0, 0.33),
    text(&["composition", "depthLayers"], DEPTH_LAYERS, "medium"),
    text(&["composition", "focalPoint"], FOCAL_POINTS, "center"),
    text(&["atmosphere", "timeOfDay"], TIMES_OF_DAY, "dusk"),
    text(&["atmosphere", "weather"], WEATHER, "clear"),
    float(&["atmosphere", "fogDensity"], 0.0, 1.0, 0.3),
    float(&["atmosphere", "visibility"], 0.1, 1.0, 0.8),
    text(&["lighting", "lightStyle"], SCENE_LIGHT_STYLES, "cinematic"),
    float(&["lighting", "contrast"], 0.0, 1.0, 0.7),
    float(&["lighting", "godRays"], 0.0, 1.0, 0.4),
    text(&["lighting", "colorTemperature"], SCENE_COLOR_TEMPERATURES, "warm"),
    float(&["lighting", "ambientOcclusion"], 0.0, 1.0, 0.6),
    text(&["style", "renderStyle"], SCENE_RENDER_STYLES, "matte_painting"),
    text(&["style", "detailLevel"], SCENE_DETAIL_LEVELS, "high"),
    text(&["style", "colorPalette"], COLOR_PALETTES, "cinematic"),
];

/// Variant-specific fields
pub(crate) const fn variant_fields(variant: Variant) -> &'static [FieldSpec] {
    match variant {
        Variant::NpcPortrait => NPC_PORTRAIT,
        Variant::WeaponItem => WEAPON_ITEM,
        Variant::EnvironmentConcept => ENVIRONMENT_CONCEPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_defaults_are_members_of_their_enums() {
        for variant in Variant::ALL {
            for spec in base_fields(variant).iter().chain(variant_fields(variant)) {
                if let (FieldKind::Enum(members), FieldDefault::Text(default)) =
                    (spec.kind(), spec.default_value())
                {
                    assert!(members.contains(&default), "{} default {default}", spec.path());
                }
                if let (FieldKind::Float { min, max }, FieldDefault::Float(default)) =
                    (spec.kind(), spec.default_value())
                {
                    assert!((min..=max).contains(&default), "{}", spec.path());
                }
            }
        }
    }

    #[test]
    fn catalog_segments_are_valid_paths() {
        for variant in Variant::ALL {
            for spec in base_fields(variant).iter().chain(variant_fields(variant)) {
                assert!(spec.path().parse::<foundry_config::FieldPath>().is_ok());
            }
        }
    }
}
