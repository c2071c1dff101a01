//! Leaflet page renderer.
//!
//! Collects what [`MapSession::compose`](crate::core::map::MapSession::compose)
//! hands it and writes one self-contained HTML document. Layer data is
//! embedded as JSON and wired up by a fixed script.

use crate::core::MapDisplay;
use crate::domain::model::{ColorBucket, LatLng, MapControl, MarkerDescriptor, TileLayer};
use crate::utils::error::{QuakeMapError, Result};
use serde::Serialize;

const FILL_OPACITY: f64 = 0.6;
const STROKE_COLOR: &str = "#000";
const STROKE_WEIGHT: f64 = 0.8;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map-id { position: absolute; inset: 0; }
    .info { padding: 6px 8px; background: rgba(255, 255, 255, 0.85); border-radius: 5px; line-height: 18px; color: #333; }
    .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.9; }
  </style>
</head>
<body>
  <div id="map-id"></div>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script>
    const model = {{MODEL}};
    const baseLayers = {};
    const overlays = {};
    const active = [];

    for (const layer of model.baseLayers) {
      const tiles = L.tileLayer(layer.url);
      baseLayers[layer.name] = tiles;
      if (layer.visible) active.push(tiles);
    }

    for (const overlay of model.overlays) {
      const circles = overlay.markers.map((m) =>
        L.circle([m.lat, m.lng], Object.assign({ radius: m.radius, fillColor: m.fillColor }, model.markerStyle))
          .bindPopup(m.popup)
      );
      const group = L.layerGroup(circles);
      overlays[overlay.name] = group;
      if (overlay.visible) active.push(group);
    }

    const map = L.map("map-id", { center: model.center, zoom: model.zoom, layers: active });

    for (const control of model.controls) {
      if (control.kind === "layers") {
        L.control.layers(baseLayers, overlays, { collapsed: control.collapsed }).addTo(map);
      } else if (control.kind === "legend") {
        const legend = L.control({ position: control.position });
        legend.onAdd = function () {
          const div = L.DomUtil.create("div", "info legend");
          div.innerHTML = control.entries
            .map((e) => '<i style="background:' + e.color + '"></i> ' + e.label)
            .join("<br>");
          return div;
        };
        legend.addTo(map);
      }
    }
  </script>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageModel {
    center: [f64; 2],
    zoom: u8,
    base_layers: Vec<BaseLayerModel>,
    overlays: Vec<OverlayModel>,
    controls: Vec<MapControl>,
    marker_style: MarkerStyle,
}

#[derive(Debug, Serialize)]
struct BaseLayerModel {
    name: String,
    url: String,
    visible: bool,
}

#[derive(Debug, Serialize)]
struct OverlayModel {
    name: String,
    visible: bool,
    markers: Vec<CircleModel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleModel {
    lat: f64,
    lng: f64,
    radius: f64,
    fill_color: ColorBucket,
    popup: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerStyle {
    fill_opacity: f64,
    color: &'static str,
    stroke: bool,
    weight: f64,
}

#[derive(Debug)]
pub struct LeafletPage {
    title: String,
    model: PageModel,
}

impl LeafletPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            model: PageModel {
                center: [0.0, 0.0],
                zoom: 0,
                base_layers: Vec::new(),
                overlays: Vec::new(),
                controls: Vec::new(),
                marker_style: MarkerStyle {
                    fill_opacity: FILL_OPACITY,
                    color: STROKE_COLOR,
                    stroke: true,
                    weight: STROKE_WEIGHT,
                },
            },
        }
    }

    pub fn marker_count(&self) -> usize {
        self.model.overlays.iter().map(|o| o.markers.len()).sum()
    }

    pub fn render(&self) -> Result<String> {
        let model = serde_json::to_string(&self.model).map_err(|e| QuakeMapError::RenderError {
            message: format!("failed to encode map model: {}", e),
        })?;
        // 避免 popup 內容提前結束 <script>
        let model = model.replace("</", "<\\/");

        Ok(PAGE_TEMPLATE
            .replace("{{TITLE}}", &escape_title(&self.title))
            .replace("{{MODEL}}", &model))
    }
}

impl MapDisplay for LeafletPage {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.model.center = [center.latitude, center.longitude];
        self.model.zoom = zoom;
    }

    fn add_tile_layer(&mut self, layer: &TileLayer, visible: bool) {
        self.model.base_layers.push(BaseLayerModel {
            name: layer.name.clone(),
            url: layer.url_template.clone(),
            visible,
        });
    }

    fn add_marker_layer(&mut self, name: &str, markers: &[MarkerDescriptor], visible: bool) {
        let markers = markers
            .iter()
            .map(|m| {
                if m.radius < 0.0 {
                    tracing::debug!(
                        "Clamping negative radius {} at ({}, {})",
                        m.radius,
                        m.latitude,
                        m.longitude
                    );
                }
                CircleModel {
                    lat: m.latitude,
                    lng: m.longitude,
                    radius: m.radius.max(0.0),
                    fill_color: m.fill_color,
                    popup: m.popup_html.clone(),
                }
            })
            .collect();

        self.model.overlays.push(OverlayModel {
            name: name.to_string(),
            visible,
            markers,
        });
    }

    fn register_control(&mut self, control: MapControl) {
        self.model.controls.push(control);
    }
}

fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::MapSession;
    use crate::domain::model::{MapView, TileStyles};

    fn marker(radius: f64, popup: &str) -> MarkerDescriptor {
        MarkerDescriptor {
            latitude: 35.0,
            longitude: -118.0,
            radius,
            fill_color: ColorBucket::Orange,
            popup_html: popup.to_string(),
        }
    }

    fn extract_model(html: &str) -> serde_json::Value {
        let start = html.find("const model = ").unwrap() + "const model = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_render_composed_session() {
        let session = MapSession::new(MapView::default(), &TileStyles::default(), "pk.test");
        let mut page = LeafletPage::new("Earthquakes, Past Day");
        session.compose(&mut page, &[marker(87_500.0, "<h3>Location: A</h3>")]);

        let html = page.render().unwrap();
        assert!(html.contains("<title>Earthquakes, Past Day</title>"));
        assert!(html.contains(r#"<div id="map-id"></div>"#));

        let model = extract_model(&html);
        assert_eq!(model["center"][0], 37.09);
        assert_eq!(model["center"][1], -95.71);
        assert_eq!(model["zoom"], 5);
        assert_eq!(model["baseLayers"].as_array().unwrap().len(), 3);
        assert_eq!(model["baseLayers"][0]["visible"], true);
        assert_eq!(model["overlays"][0]["name"], "Earthquakes");
        assert_eq!(model["overlays"][0]["markers"][0]["fillColor"], "#ff6f08");
        assert_eq!(model["overlays"][0]["markers"][0]["radius"], 87_500.0);
        assert_eq!(model["markerStyle"]["fillOpacity"], 0.6);
        assert_eq!(model["markerStyle"]["color"], "#000");
        assert_eq!(model["controls"][1]["kind"], "legend");
        assert_eq!(page.marker_count(), 1);
    }

    #[test]
    fn test_negative_radius_is_clamped() {
        let mut page = LeafletPage::new("t");
        page.add_marker_layer("Earthquakes", &[marker(-10_000.0, "micro")], true);

        let model = extract_model(&page.render().unwrap());
        assert_eq!(model["overlays"][0]["markers"][0]["radius"], 0.0);
    }

    #[test]
    fn test_popup_cannot_close_script() {
        let mut page = LeafletPage::new("t");
        page.add_marker_layer("Earthquakes", &[marker(1.0, "</script><b>x</b>")], true);

        let html = page.render().unwrap();
        assert_eq!(html.matches("</script>").count(), 2);

        let model = extract_model(&html);
        assert_eq!(
            model["overlays"][0]["markers"][0]["popup"],
            "</script><b>x</b>"
        );
    }
}
