//! Tile map document output.
//!
//! Serializes an encoded grid as a Tiled-compatible TMX document with two
//! CSV layers: `main` holds the 1..N tile identities and `high_prio` holds
//! the 0/1 priority flags. The tileset references the source image by bare
//! file name, so the document stays valid wherever the pair is moved
//! together.

use std::fs;
use std::path::Path;

use crate::error::{PrioError, Result};
use crate::types::{TileGrid, TILE_SIZE};

/// A renderable TMX document for one image.
#[derive(Debug, Clone)]
pub struct MapDocument {
    image_source: String,
    tileset_name: String,
    pixel_width: u32,
    pixel_height: u32,
    width: u32,
    height: u32,
    main_csv: String,
    priority_csv: String,
}

impl MapDocument {
    /// Build a document from an image file name, its pixel dimensions and
    /// its encoded grid.
    pub fn new(image_name: &str, pixel_width: u32, pixel_height: u32, grid: &TileGrid) -> Self {
        let stem = image_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(image_name);
        Self {
            image_source: image_name.to_string(),
            tileset_name: format!("{}_tiles", stem),
            pixel_width,
            pixel_height,
            width: grid.width(),
            height: grid.height(),
            main_csv: grid.csv_body(),
            priority_csv: grid.priority_csv_body(),
        }
    }

    /// Render the document as XML text.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<map version=\"1.9\" tiledversion=\"1.9.2\" orientation=\"orthogonal\" renderorder=\"right-down\" width=\"{}\" height=\"{}\" tilewidth=\"{}\" tileheight=\"{}\" infinite=\"0\">\n",
            self.width, self.height, TILE_SIZE, TILE_SIZE
        ));
        out.push_str(&format!(
            "  <tileset firstgid=\"1\" name=\"{}\" tilewidth=\"{}\" tileheight=\"{}\" tilecount=\"{}\" columns=\"{}\">\n",
            escape_attr(&self.tileset_name),
            TILE_SIZE,
            TILE_SIZE,
            self.width * self.height,
            self.width
        ));
        out.push_str(&format!(
            "    <image source=\"{}\" width=\"{}\" height=\"{}\"/>\n",
            escape_attr(&self.image_source),
            self.pixel_width,
            self.pixel_height
        ));
        out.push_str("  </tileset>\n");
        self.push_layer(&mut out, 1, "main", &self.main_csv);
        self.push_layer(&mut out, 2, "high_prio", &self.priority_csv);
        out.push_str("</map>\n");
        out
    }

    /// Write the document to a file.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml()).map_err(|e| PrioError::Serialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // CSV rows start at column zero so the layer data stays byte-exact.
    fn push_layer(&self, out: &mut String, id: u32, name: &str, csv: &str) {
        out.push_str(&format!(
            "  <layer id=\"{}\" name=\"{}\" width=\"{}\" height=\"{}\">\n",
            id, name, self.width, self.height
        ));
        out.push_str("    <data encoding=\"csv\">\n");
        out.push_str(csv);
        out.push_str("</data>\n");
        out.push_str("  </layer>\n");
    }
}

/// Escape a string for use inside a double-quoted XML attribute.
fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::PRIORITY_MASK;

    fn sample_grid() -> TileGrid {
        TileGrid::new(2, 2, vec![1, 2 | PRIORITY_MASK, 3, 4])
    }

    #[test]
    fn test_to_xml_full_document() {
        let doc = MapDocument::new("beach.png", 16, 16, &sample_grid());
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.9" tiledversion="1.9.2" orientation="orthogonal" renderorder="right-down" width="2" height="2" tilewidth="8" tileheight="8" infinite="0">
  <tileset firstgid="1" name="beach_tiles" tilewidth="8" tileheight="8" tilecount="4" columns="2">
    <image source="beach.png" width="16" height="16"/>
  </tileset>
  <layer id="1" name="main" width="2" height="2">
    <data encoding="csv">
1,2
3,4
</data>
  </layer>
  <layer id="2" name="high_prio" width="2" height="2">
    <data encoding="csv">
0,1
0,0
</data>
  </layer>
</map>
"#;
        assert_eq!(doc.to_xml(), expected);
    }

    #[test]
    fn test_tileset_name_uses_stem() {
        let doc = MapDocument::new("sprites.v2.png", 16, 16, &sample_grid());
        assert!(doc.to_xml().contains("name=\"sprites.v2_tiles\""));
    }

    #[test]
    fn test_image_reference_is_bare_name() {
        let doc = MapDocument::new("beach.png", 16, 16, &sample_grid());
        assert!(doc.to_xml().contains("source=\"beach.png\""));
        assert!(!doc.to_xml().contains("source=\"/"));
    }

    #[test]
    fn test_attribute_escaping() {
        insta::assert_snapshot!(escape_attr(r#"fish&"chips".png"#), @"fish&amp;&quot;chips&quot;.png");

        let doc = MapDocument::new("a&b.png", 16, 16, &sample_grid());
        assert!(doc.to_xml().contains("source=\"a&amp;b.png\""));
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beach_map.tmx");
        let doc = MapDocument::new("beach.png", 16, 16, &sample_grid());

        doc.write(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, doc.to_xml());
    }
}
