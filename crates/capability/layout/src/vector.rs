//! 布局序列化：选区 → 矩形图元 + 裁剪视口，以及矢量标记的读写。
//!
//! 输出是输入的纯函数：相同选区与格子尺寸总是得到逐字节相同的标记，
//! 便于比对已保存布局与编辑中的布局。

use crate::error::LayoutError;
use crate::grid::Grid;
use crate::selection::SelectionSet;
use std::fmt::Write as _;

const ELEMENT_ID_PREFIX: &str = "cell-";
const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// 单个单元的矩形图元（像素坐标）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RectPrimitive {
    pub element_id: String,
    /// 来源格子索引。
    pub cell: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// 展示编号：选区中的 1 起位置，不是格子索引。
    pub label: u32,
}

impl RectPrimitive {
    /// 持久化用的单元几何（不含文字标签）。
    pub fn to_geometry(&self) -> String {
        format!(
            r#"<rect id="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.element_id, self.x, self.y, self.width, self.height
        )
    }

    fn label_center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// 选中格子的行列包围盒。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

impl BoundingBox {
    pub fn rows(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    pub fn cols(&self) -> u32 {
        self.max_col - self.min_col + 1
    }
}

/// 序列化结果。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VectorLayout {
    pub cell_size_px: u32,
    pub rects: Vec<RectPrimitive>,
    /// 空选区时为 None。
    pub bounds: Option<BoundingBox>,
}

impl VectorLayout {
    /// 裁剪视口宽度（像素），空选区为 0。
    pub fn layout_width(&self) -> u32 {
        self.bounds
            .map(|bounds| bounds.cols() * self.cell_size_px)
            .unwrap_or(0)
    }

    /// 裁剪视口高度（像素），空选区为 0。
    pub fn layout_height(&self) -> u32 {
        self.bounds
            .map(|bounds| bounds.rows() * self.cell_size_px)
            .unwrap_or(0)
    }

    /// 裁剪视口左上角（像素）。
    pub fn origin(&self) -> (u32, u32) {
        self.bounds
            .map(|bounds| {
                (
                    bounds.min_col * self.cell_size_px,
                    bounds.min_row * self.cell_size_px,
                )
            })
            .unwrap_or((0, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// 标记风格。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupStyle {
    /// 面向用户的渲染：每个矩形带居中的编号文字。
    Labelled,
    /// 仅几何。
    Geometry,
}

/// 格子元素 ID。
pub fn element_id(cell: u32) -> String {
    format!("{ELEMENT_ID_PREFIX}{cell}")
}

/// 将有序选区序列化为矩形图元与包围盒。
///
/// 网格像素尺寸超出 `u32` 或格子越界时返回错误，之后的像素运算都不会溢出。
pub fn serialize(
    cells: &SelectionSet,
    grid: &Grid,
    cell_size_px: u32,
) -> Result<VectorLayout, LayoutError> {
    grid.pixel_extent(cell_size_px)?;
    let mut rects = Vec::with_capacity(cells.len());
    let mut bounds: Option<BoundingBox> = None;
    for (position, cell) in cells.cells().iter().copied().enumerate() {
        let (row, col) = grid.coord_of(cell)?;
        rects.push(RectPrimitive {
            element_id: element_id(cell),
            cell,
            x: col * cell_size_px,
            y: row * cell_size_px,
            width: cell_size_px,
            height: cell_size_px,
            label: position as u32 + 1,
        });
        bounds = Some(match bounds {
            None => BoundingBox {
                min_row: row,
                max_row: row,
                min_col: col,
                max_col: col,
            },
            Some(current) => BoundingBox {
                min_row: current.min_row.min(row),
                max_row: current.max_row.max(row),
                min_col: current.min_col.min(col),
                max_col: current.max_col.max(col),
            },
        });
    }
    Ok(VectorLayout {
        cell_size_px,
        rects,
        bounds,
    })
}

/// 渲染 SVG 标记，viewBox 为裁剪后的包围盒。
pub fn render_markup(layout: &VectorLayout, style: MarkupStyle) -> String {
    let (origin_x, origin_y) = layout.origin();
    let width = layout.layout_width();
    let height = layout.layout_height();
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="{SVG_NS}" viewBox="{origin_x} {origin_y} {width} {height}" width="{width}" height="{height}">"#
    );
    for rect in &layout.rects {
        out.push('\n');
        out.push_str(&rect.to_geometry());
        if style == MarkupStyle::Labelled {
            let (cx, cy) = rect.label_center();
            let _ = write!(
                out,
                r#"
<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                rect.label
            );
        }
    }
    out.push_str("\n</svg>");
    out
}

/// 从标记中读回矩形图元。
///
/// 无文字标签时，编号取矩形在标记中的顺序位置。
pub fn parse_rects(markup: &str) -> Result<Vec<RectPrimitive>, LayoutError> {
    let mut rects: Vec<RectPrimitive> = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        rest = &rest[start + 1..];
        let end = rest
            .find('>')
            .ok_or_else(|| LayoutError::InvalidMarkup("unterminated tag".to_string()))?;
        let tag = &rest[..end];
        rest = &rest[end + 1..];
        let name = tag
            .split(|ch: char| ch.is_whitespace() || ch == '/')
            .next()
            .unwrap_or_default();
        match name {
            "rect" => {
                let body = tag.trim_start_matches("rect").trim_end_matches('/');
                let label = rects.len() as u32 + 1;
                rects.push(rect_from_attributes(body, label)?);
            }
            "text" => {
                let close = rest
                    .find("</text>")
                    .ok_or_else(|| LayoutError::InvalidMarkup("unterminated text".to_string()))?;
                let content = rest[..close].trim();
                rest = &rest[close + "</text>".len()..];
                let Some(last) = rects.last_mut() else {
                    return Err(LayoutError::InvalidMarkup("label before rect".to_string()));
                };
                last.label = content
                    .parse::<u32>()
                    .map_err(|_| LayoutError::InvalidMarkup(format!("label: {content}")))?;
            }
            _ => {}
        }
    }
    Ok(rects)
}

fn rect_from_attributes(body: &str, label: u32) -> Result<RectPrimitive, LayoutError> {
    let attributes = parse_attributes(body)?;
    let element_id = attribute(&attributes, "id")?.to_string();
    let cell = element_id
        .strip_prefix(ELEMENT_ID_PREFIX)
        .and_then(|value| value.parse::<u32>().ok())
        .ok_or_else(|| LayoutError::InvalidMarkup(format!("id: {element_id}")))?;
    Ok(RectPrimitive {
        cell,
        x: numeric_attribute(&attributes, "x")?,
        y: numeric_attribute(&attributes, "y")?,
        width: numeric_attribute(&attributes, "width")?,
        height: numeric_attribute(&attributes, "height")?,
        label,
        element_id,
    })
}

fn attribute<'a>(attributes: &[(&str, &'a str)], key: &str) -> Result<&'a str, LayoutError> {
    attributes
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
        .ok_or_else(|| LayoutError::InvalidMarkup(format!("rect missing {key}")))
}

fn numeric_attribute(attributes: &[(&str, &str)], key: &str) -> Result<u32, LayoutError> {
    let value = attribute(attributes, key)?;
    value
        .parse::<u32>()
        .map_err(|_| LayoutError::InvalidMarkup(format!("{key}: {value}")))
}

fn parse_attributes(body: &str) -> Result<Vec<(&str, &str)>, LayoutError> {
    let mut attributes = Vec::new();
    let mut rest = body.trim();
    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| LayoutError::InvalidMarkup(format!("attribute: {rest}")))?;
        let name = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let Some(quoted) = after.strip_prefix('"') else {
            return Err(LayoutError::InvalidMarkup(format!("unquoted {name}")));
        };
        let close = quoted
            .find('"')
            .ok_or_else(|| LayoutError::InvalidMarkup(format!("unterminated {name}")))?;
        attributes.push((name, &quoted[..close]));
        rest = quoted[close + 1..].trim_start();
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_split_on_quotes() {
        let attrs = parse_attributes(r#" id="cell-3"  x="10" y = "20" "#).expect("attrs");
        assert_eq!(attrs, vec![("id", "cell-3"), ("x", "10"), ("y", "20")]);
    }

    #[test]
    fn attributes_reject_unquoted_values() {
        let err = parse_attributes("x=10").expect_err("unquoted");
        assert_eq!(err, LayoutError::InvalidMarkup("unquoted x".to_string()));
    }
}
