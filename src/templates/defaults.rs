//! The built-in template set written by `templates create-defaults`.

use super::{BackgroundType, PatternType, PostTemplate};
use crate::render::{GradientDirection, LogoAnchor};
use crate::types::Dimension;

fn gradient(name: &str, dimension: &'static str, scheme: &str, direction: GradientDirection) -> PostTemplate {
    let mut t = PostTemplate::new(
        name,
        Dimension::Preset(dimension),
        BackgroundType::Gradient,
        scheme,
    );
    t.gradient_direction = Some(direction);
    t
}

pub fn default_templates() -> Vec<PostTemplate> {
    use GradientDirection::*;

    let mut professional_gradient = gradient("professional_gradient", "square", "professional_dark", Vertical);
    professional_gradient.add_vignette = true;
    professional_gradient.headline_shadow = true;

    let mut bold_red_lines = gradient("bold_red_lines", "square", "bold_red", Diagonal);
    bold_red_lines.pattern_type = Some(PatternType::Lines);
    bold_red_lines.pattern_angle = Some(45);
    bold_red_lines.pattern_spacing = Some(60);
    bold_red_lines.logo_position = LogoAnchor::TopCenter;
    bold_red_lines.headline_position = [40, 500];
    bold_red_lines.headline_size = 80;
    bold_red_lines.headline_outline = true;

    let mut minimal_clean = PostTemplate::new(
        "minimal_clean",
        Dimension::Preset("square"),
        BackgroundType::Solid,
        "minimal_gray",
    );
    minimal_clean.headline_size = 65;
    minimal_clean.has_subheadline = true;
    minimal_clean.subheadline_position = [40, 550];

    let mut corporate_professional = gradient("corporate_professional", "square", "corporate_tech", Radial);
    corporate_professional.add_vignette = true;
    corporate_professional.vignette_intensity = 0.4;
    corporate_professional.logo_position = LogoAnchor::TopRight;
    corporate_professional.headline_position = [40, 350];
    corporate_professional.headline_size = 75;
    corporate_professional.has_subheadline = true;
    corporate_professional.subheadline_position = [40, 520];

    let mut creative_textbox = gradient("creative_textbox", "square", "gradient_ocean", Diagonal);
    creative_textbox.pattern_type = Some(PatternType::Circles);
    creative_textbox.use_text_box = true;
    creative_textbox.text_box_position = [40, 650];
    creative_textbox.text_box_size = [1000, 300];
    creative_textbox.headline_position = [40, 350];

    let mut bold_purple_modern = gradient("bold_purple_modern", "square", "bold_purple", Vertical);
    bold_purple_modern.add_noise = true;
    bold_purple_modern.noise_intensity = 5;
    bold_purple_modern.logo_position = LogoAnchor::TopCenter;
    bold_purple_modern.headline_position = [40, 450];
    bold_purple_modern.headline_size = 80;
    bold_purple_modern.headline_shadow = true;

    let mut linkedin_story = gradient("linkedin_story", "story", "professional_blue", Vertical);
    linkedin_story.add_vignette = true;
    linkedin_story.logo_position = LogoAnchor::TopCenter;
    linkedin_story.logo_size = [250, 250];
    linkedin_story.logo_margin = 60;
    linkedin_story.headline_position = [60, 600];
    linkedin_story.headline_size = 90;
    linkedin_story.headline_max_width = Some(960);

    let mut sunset_horizontal = gradient("sunset_horizontal", "horizontal", "gradient_sunset", Horizontal);
    sunset_horizontal.pattern_type = Some(PatternType::Lines);
    sunset_horizontal.pattern_angle = Some(135);
    sunset_horizontal.logo_position = LogoAnchor::Center;
    sunset_horizontal.headline_position = [50, 250];
    sunset_horizontal.headline_size = 85;
    sunset_horizontal.headline_max_width = Some(1100);

    let mut dark_geometric = gradient("dark_geometric", "square", "professional_dark", Radial);
    dark_geometric.pattern_type = Some(PatternType::Rectangles);
    dark_geometric.add_vignette = true;
    dark_geometric.headline_outline = true;

    let mut forest_minimal = gradient("forest_minimal", "square", "gradient_forest", Vertical);
    forest_minimal.add_noise = true;
    forest_minimal.noise_intensity = 8;
    forest_minimal.logo_position = LogoAnchor::TopRight;
    forest_minimal.headline_position = [40, 420];
    forest_minimal.headline_size = 68;
    forest_minimal.has_subheadline = true;
    forest_minimal.subheadline_position = [40, 580];

    vec![
        professional_gradient,
        bold_red_lines,
        minimal_clean,
        corporate_professional,
        creative_textbox,
        bold_purple_modern,
        linkedin_story,
        sunset_horizontal,
        dark_geometric,
        forest_minimal,
    ]
}
