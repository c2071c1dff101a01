use crate::core::encoder;
use crate::core::{ConfigProvider, MapDisplay};
use crate::domain::model::{
    ControlPosition, MapControl, MapView, MarkerDescriptor, TileLayer, TileStyles,
};

const MAPBOX_STYLE_BASE: &str = "https://api.mapbox.com/styles/v1/mapbox";

pub const OVERLAY_NAME: &str = "Earthquakes";

/// Map configuration assembled once at startup and applied to a
/// [`MapDisplay`]. The first base layer is the one shown on load.
#[derive(Debug, Clone)]
pub struct MapSession {
    view: MapView,
    base_layers: Vec<TileLayer>,
}

impl MapSession {
    pub fn new(view: MapView, styles: &TileStyles, access_token: &str) -> Self {
        let base_layers = vec![
            tile_layer("Satellite", &styles.satellite, access_token),
            tile_layer("Grayscale", &styles.grayscale, access_token),
            tile_layer("Outdoors", &styles.outdoors, access_token),
        ];
        Self { view, base_layers }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.map_view(),
            &config.tile_styles(),
            config.access_token(),
        )
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn base_layers(&self) -> &[TileLayer] {
        &self.base_layers
    }

    pub fn compose<D: MapDisplay>(&self, display: &mut D, markers: &[MarkerDescriptor]) {
        display.set_view(self.view.center, self.view.zoom);

        for (i, layer) in self.base_layers.iter().enumerate() {
            display.add_tile_layer(layer, i == 0);
        }

        tracing::debug!("Adding {} markers to overlay '{}'", markers.len(), OVERLAY_NAME);
        display.add_marker_layer(OVERLAY_NAME, markers, true);

        display.register_control(MapControl::Layers { collapsed: false });
        display.register_control(MapControl::Legend {
            position: ControlPosition::BottomRight,
            entries: encoder::legend_entries(),
        });
    }
}

fn tile_layer(name: &str, style: &str, access_token: &str) -> TileLayer {
    let token: String = url::form_urlencoded::byte_serialize(access_token.as_bytes()).collect();
    TileLayer {
        name: name.to_string(),
        url_template: format!(
            "{}/{}/tiles/256/{{z}}/{{x}}/{{y}}?access_token={}",
            MAPBOX_STYLE_BASE, style, token
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ColorBucket, LatLng};

    #[derive(Debug, PartialEq)]
    enum Call {
        View(LatLng, u8),
        Tile(String, bool),
        Markers(String, usize, bool),
        Control(MapControl),
    }

    #[derive(Default)]
    struct RecordingDisplay {
        calls: Vec<Call>,
    }

    impl MapDisplay for RecordingDisplay {
        fn set_view(&mut self, center: LatLng, zoom: u8) {
            self.calls.push(Call::View(center, zoom));
        }

        fn add_tile_layer(&mut self, layer: &TileLayer, visible: bool) {
            self.calls.push(Call::Tile(layer.name.clone(), visible));
        }

        fn add_marker_layer(&mut self, name: &str, markers: &[MarkerDescriptor], visible: bool) {
            self.calls
                .push(Call::Markers(name.to_string(), markers.len(), visible));
        }

        fn register_control(&mut self, control: MapControl) {
            self.calls.push(Call::Control(control));
        }
    }

    fn marker() -> MarkerDescriptor {
        MarkerDescriptor {
            latitude: 1.0,
            longitude: 2.0,
            radius: 50_000.0,
            fill_color: ColorBucket::LightOrange,
            popup_html: "<h3>Location: test</h3>".to_string(),
        }
    }

    #[test]
    fn test_default_session_layers() {
        let session = MapSession::new(MapView::default(), &TileStyles::default(), "pk.test");

        let urls: Vec<_> = session
            .base_layers()
            .iter()
            .map(|l| l.url_template.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://api.mapbox.com/styles/v1/mapbox/satellite-v9/tiles/256/{z}/{x}/{y}?access_token=pk.test",
                "https://api.mapbox.com/styles/v1/mapbox/dark-v9/tiles/256/{z}/{x}/{y}?access_token=pk.test",
                "https://api.mapbox.com/styles/v1/mapbox/outdoors-v10/tiles/256/{z}/{x}/{y}?access_token=pk.test",
            ]
        );
    }

    #[test]
    fn test_access_token_is_percent_encoded() {
        let session = MapSession::new(MapView::default(), &TileStyles::default(), "pk.a&b#c=d");

        for layer in session.base_layers() {
            assert!(layer
                .url_template
                .ends_with("?access_token=pk.a%26b%23c%3Dd"));
            let parsed = url::Url::parse(&layer.url_template).unwrap();
            let token = parsed
                .query_pairs()
                .find(|(k, _)| k == "access_token")
                .map(|(_, v)| v.into_owned());
            assert_eq!(token.as_deref(), Some("pk.a&b#c=d"));
        }
    }

    #[test]
    fn test_compose_order_and_visibility() {
        let session = MapSession::new(MapView::default(), &TileStyles::default(), "pk.test");
        let mut display = RecordingDisplay::default();

        session.compose(&mut display, &[marker(), marker()]);

        assert_eq!(display.calls[0], Call::View(LatLng::new(37.09, -95.71), 5));
        assert_eq!(display.calls[1], Call::Tile("Satellite".to_string(), true));
        assert_eq!(display.calls[2], Call::Tile("Grayscale".to_string(), false));
        assert_eq!(display.calls[3], Call::Tile("Outdoors".to_string(), false));
        assert_eq!(
            display.calls[4],
            Call::Markers("Earthquakes".to_string(), 2, true)
        );
        assert_eq!(
            display.calls[5],
            Call::Control(MapControl::Layers { collapsed: false })
        );
        match &display.calls[6] {
            Call::Control(MapControl::Legend { position, entries }) => {
                assert_eq!(*position, ControlPosition::BottomRight);
                assert_eq!(entries.len(), 6);
            }
            other => panic!("expected legend control, got {:?}", other),
        }
    }

    #[test]
    fn test_compose_with_no_markers_still_builds_map() {
        let session = MapSession::new(MapView::default(), &TileStyles::default(), "pk.test");
        let mut display = RecordingDisplay::default();

        session.compose(&mut display, &[]);

        assert!(display
            .calls
            .contains(&Call::Markers("Earthquakes".to_string(), 0, true)));
        assert_eq!(display.calls.len(), 7);
    }
}
