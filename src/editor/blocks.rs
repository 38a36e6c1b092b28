//! Block palette offered by the page editor.

/// A draggable content snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub label: String,
    pub category: String,
    pub content: String,
}

/// Blocks contributed by the builder's webpage preset
pub const PRESET_BLOCKS: [&str; 3] = ["link-block", "quote", "text-basic"];

/// Category the Kayan Pro blocks are listed under
pub const DOMAIN_CATEGORY: &str = "كيان برو";

/// Kayan Pro specific snippets
pub fn domain_blocks() -> Vec<Block> {
    vec![Block {
        id: "unit-selector".to_string(),
        label: "اختيار وحدة".to_string(),
        category: DOMAIN_CATEGORY.to_string(),
        content: concat!(
            "<div class=\"unit-selector\">",
            "<h3>اختر وحدتك المثالية</h3>",
            "<select class=\"project-select\">",
            "<option>برج حمد</option>",
            "<option>برج ليليان</option>",
            "</select>",
            "<div class=\"units-grid\"></div>",
            "</div>"
        )
        .to_string(),
    }]
}
