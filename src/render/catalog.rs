//! Unit and media grids.

use super::escape_html;
use crate::models::{MediaAsset, Unit, UnitCategory};

/// Image shown for units without photos
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

pub fn render_units(units: &[Unit]) -> String {
    units
        .iter()
        .map(|unit| {
            let image = unit
                .images
                .first()
                .map(String::as_str)
                .unwrap_or(PLACEHOLDER_IMAGE);
            let category = match unit.unit_type {
                UnitCategory::Residential => "سكني",
                UnitCategory::Administrative => "إداري",
            };

            format!(
                "<div class=\"unit-card\">\
                 <img src=\"{image}\" alt=\"{number}\">\
                 <div class=\"unit-info\">\
                 <h4>وحدة {number}</h4>\
                 <p>{category}</p>\
                 <p>المساحة: {area} م²</p>\
                 <p>السعر: {price} ريال</p>\
                 <span class=\"status {status}\">{status}</span>\
                 </div></div>",
                image = escape_html(image),
                number = escape_html(&unit.unit_number),
                category = category,
                area = unit.area_sqm,
                price = unit.total_price,
                status = escape_html(&unit.status),
            )
        })
        .collect()
}

pub fn render_media(assets: &[MediaAsset]) -> String {
    assets
        .iter()
        .map(|asset| {
            format!(
                "<div class=\"media-card\">\
                 <img src=\"{thumb}\" alt=\"{name}\">\
                 <div class=\"media-info\"><p>{name}</p><small>{size} KB</small></div>\
                 </div>",
                thumb = escape_html(&asset.thumbnail_url),
                name = escape_html(&asset.filename),
                size = asset.size_kb(),
            )
        })
        .collect()
}
