//! SVG visualization of a wall grid and what hangs on it.
//!
//! Draws one annotated panel per wall: the cell grid, the center cell, the
//! recorded occupancy footprint (dashed) and each frame's outer rectangle.
//!
//! # Example
//!
//! ```
//! use zenhang::{ArtworkSpec, Gallery, PlacementConfig, WallSpec, svg::render_wall_svg};
//!
//! let mut gallery = Gallery::new(PlacementConfig::default());
//! let wall = gallery.add_wall(WallSpec::new(96.0, 72.0)).unwrap();
//! gallery.place_center(wall, &ArtworkSpec::new("Nocturne").size_inches(30.0, 24.0)).unwrap();
//!
//! let svg = render_wall_svg(&gallery, wall).unwrap();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("Nocturne"));
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::frame::FrameInstance;
use crate::grid::{WallGrid, WallId};
use crate::occupancy::Footprint;
use crate::place::Gallery;

/// Maximum pixel width of the wall panel.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum pixel height of the wall panel.
const MAX_PANEL_H: f64 = 320.0;
/// Horizontal margin.
const MARGIN_X: f64 = 40.0;
/// Top margin above the label.
const MARGIN_TOP: f64 = 30.0;
/// Height of label text area above the panel.
const LABEL_H: f64 = 22.0;
/// Height of annotation text area below the panel.
const ANNOTATION_H: f64 = 24.0;
/// Grids wider or taller than this many cells draw every 12th line only.
const DENSE_GRID: u32 = 64;

/// Rectangle in cell-edge coordinates, `y` measured up from the wall bottom.
#[derive(Copy, Clone, Debug)]
struct CellRect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl CellRect {
    /// `footprint` centered on cell `(cx, cy)`.
    fn centered(cx: u32, cy: u32, footprint: Footprint) -> Self {
        let w = footprint.width_cells as f64;
        let h = footprint.height_cells as f64;
        Self {
            x: cx as f64 + 0.5 - w / 2.0,
            y: cy as f64 + 0.5 - h / 2.0,
            w,
            h,
        }
    }
}

/// Everything drawn for one wall.
struct Panel {
    label: String,
    cells: (u32, u32),
    center: (u32, u32),
    footprint: Option<CellRect>,
    frames: Vec<(String, CellRect)>,
    annotation: String,
}

/// Render a wall of `gallery` as a complete SVG document.
///
/// Returns `None` if `wall` is not registered.
pub fn render_wall_svg(gallery: &Gallery, wall: WallId) -> Option<String> {
    let grid = gallery.wall(wall)?;
    let panel = build_panel(gallery, wall, grid);
    Some(render_panel(&panel))
}

fn frame_rect(grid: &WallGrid, frame: &FrameInstance) -> Option<CellRect> {
    let (cx, cy) = grid.cell_from_world(frame.transform.position)?;
    Some(CellRect::centered(
        cx,
        cy,
        Footprint::from_inches(frame.outer_size_inches()),
    ))
}

fn build_panel(gallery: &Gallery, wall: WallId, grid: &WallGrid) -> Panel {
    let occupancy = grid.occupancy();
    let center = grid.center_cell();

    let footprint = occupancy.center_frame().and_then(|owner| {
        let fp = occupancy.footprint();
        if occupancy.is_pair() {
            // Pair footprints start at the left frame's left edge.
            let left = gallery.frame(owner).and_then(|f| frame_rect(grid, f))?;
            Some(CellRect {
                x: left.x,
                y: center.1 as f64 + 0.5 - fp.height_cells as f64 / 2.0,
                w: fp.width_cells as f64,
                h: fp.height_cells as f64,
            })
        } else {
            Some(CellRect::centered(center.0, center.1, fp))
        }
    });

    let frames: Vec<(String, CellRect)> = gallery
        .frames_on(wall)
        .filter_map(|(_, f)| frame_rect(grid, f).map(|r| (f.artwork.title.clone(), r)))
        .collect();

    let annotation = match occupancy.center_frame() {
        None => String::from("center free"),
        Some(_) => {
            let fp = occupancy.footprint();
            format!(
                "{} occupied, footprint {}×{} cells",
                if occupancy.is_pair() { "pair" } else { "center" },
                fp.width_cells,
                fp.height_cells
            )
        }
    };

    Panel {
        label: format!(
            "Wall {}  {}×{} cells",
            wall.index(),
            grid.cells_x(),
            grid.cells_y()
        ),
        cells: (grid.cells_x(), grid.cells_y()),
        center,
        footprint,
        frames,
        annotation,
    }
}

/// Scale a cell grid to fit within MAX_PANEL_W × MAX_PANEL_H.
fn scale_to_fit(cells: (u32, u32)) -> (f64, f64, f64) {
    let w = cells.0.max(1) as f64;
    let h = cells.1.max(1) as f64;
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

fn render_panel(panel: &Panel) -> String {
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;
    let total_h = MARGIN_TOP + LABEL_H + MAX_PANEL_H + ANNOTATION_H + MARGIN_TOP;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .title { font-size: 10px; fill: #1d3d5c; }
  .wall { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .gridline { stroke: #d0d0d0; stroke-width: 0.5; }
  .center { fill: #f2c14e; }
  .footprint { fill: none; stroke: #c0392b; stroke-width: 1.5; stroke-dasharray: 4,2; }
  .frame { fill: #6ba3d6; fill-opacity: 0.8; stroke: #2c6faa; stroke-width: 1.5; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .title { fill: #e0eefa; }
    .wall { fill: #2d2d2d; stroke: #555; }
    .gridline { stroke: #3a3a3a; }
    .center { fill: #8a6d1f; }
    .footprint { stroke: #e57368; }
    .frame { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##,
    );

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        y + 14.0,
        escape_xml(&panel.label)
    ));
    svg.push('\n');
    y += LABEL_H;

    let (pw, ph, scale) = scale_to_fit(panel.cells);
    let px = center_x - pw / 2.0;
    let py = y;
    // Cell-edge coordinates → SVG pixels (SVG y grows downward).
    let to_px = |r: &CellRect| {
        (
            px + r.x * scale,
            py + (panel.cells.1 as f64 - r.y - r.h) * scale,
            r.w * scale,
            r.h * scale,
        )
    };

    svg.push_str(&format!(
        r#"<rect x="{px:.1}" y="{py:.1}" width="{pw:.1}" height="{ph:.1}" class="wall"/>"#
    ));
    svg.push('\n');

    let step = |n: u32| if n > DENSE_GRID { 12 } else { 1 };
    for i in (1..panel.cells.0).step_by(step(panel.cells.0)) {
        let x = px + i as f64 * scale;
        svg.push_str(&format!(
            r#"<line x1="{x:.1}" y1="{py:.1}" x2="{x:.1}" y2="{:.1}" class="gridline"/>"#,
            py + ph
        ));
        svg.push('\n');
    }
    for j in (1..panel.cells.1).step_by(step(panel.cells.1)) {
        let ly = py + j as f64 * scale;
        svg.push_str(&format!(
            r#"<line x1="{px:.1}" y1="{ly:.1}" x2="{:.1}" y2="{ly:.1}" class="gridline"/>"#,
            px + pw
        ));
        svg.push('\n');
    }

    let center = CellRect {
        x: panel.center.0 as f64,
        y: panel.center.1 as f64,
        w: 1.0,
        h: 1.0,
    };
    let (cx, cy, cw, ch) = to_px(&center);
    svg.push_str(&format!(
        r#"<rect x="{cx:.1}" y="{cy:.1}" width="{cw:.1}" height="{ch:.1}" class="center"/>"#
    ));
    svg.push('\n');

    for (title, rect) in &panel.frames {
        let (fx, fy, fw, fh) = to_px(rect);
        svg.push_str(&format!(
            r#"<rect x="{fx:.1}" y="{fy:.1}" width="{fw:.1}" height="{fh:.1}" class="frame"/>"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" class="title" text-anchor="middle">{}</text>"#,
            fx + fw / 2.0,
            fy + fh / 2.0 + 3.0,
            escape_xml(title)
        ));
        svg.push('\n');
    }

    if let Some(fp) = &panel.footprint {
        let (fx, fy, fw, fh) = to_px(fp);
        svg.push_str(&format!(
            r#"<rect x="{fx:.1}" y="{fy:.1}" width="{fw:.1}" height="{fh:.1}" class="footprint"/>"#
        ));
        svg.push('\n');
    }

    svg.push_str(&format!(
        r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
        center_x,
        py + ph + 16.0,
        escape_xml(&panel.annotation)
    ));
    svg.push('\n');

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
