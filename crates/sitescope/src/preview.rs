//! The preview state owner.
//!
//! A [`Preview`] holds everything one open preview needs: the scene, layer
//! flags, environmental state, overlay slots and the current generation.
//! Hosts drive it with events (geometry arrival, toggles, slider moves,
//! async completions) and call [`Preview::prepare_frame`] before drawing.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sitescope_core::{
    EnvironmentalState, GeoOrigin, Generation, LayerKind, LayerSet, NodeId, OverlayKind,
    PreviewOptions, ResourceCounts, Result, Scene, SceneBounds, SitescopeError, Tagged,
    TextureHandle,
};
use sitescope_render::{capture_frame, RenderSurface};
use sitescope_structures::{
    ingest, synthesize, BatchKind, ClimateData, GeometryPayload, IngestStats,
};

use crate::capture::{ImageGenerator, RenderPrompt, RenderReport};
use crate::map_underlay::{self, MapUnderlayInput, TileRequest};
use crate::overlays::{
    solar_path, sun_study, wind_field, InputKey, Lighting, OverlaySlot, SolarPathInput,
    SunStudyInput, WindFieldInput,
};

/// Outcome of the most recent geometry load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet, or the preview was closed.
    #[default]
    Empty,
    Loaded,
    /// The load failed; the preview shows nothing.
    Failed(String),
}

/// Availability of climate data for the current load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClimateStatus {
    /// Not yet fetched, or the fetch is in flight.
    #[default]
    Pending,
    Available(ClimateData),
    /// The fetch failed or returned nothing; not retried for this load.
    Unavailable,
}

/// Proof that a climate fetch was issued for a given load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub origin: GeoOrigin,
}

/// Sunrise/sunset-like crossing times of the solar path, in local hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCrossings {
    pub first: f64,
    pub last: f64,
}

/// State of one open preview.
pub struct Preview {
    options: PreviewOptions,
    study_date: NaiveDate,
    scene: Scene,
    layers: LayerSet,
    env: EnvironmentalState,
    generation: Generation,
    status: LoadStatus,
    stats: IngestStats,

    climate: ClimateStatus,
    climate_requested: bool,

    lighting: Lighting,
    sun_study_key: InputKey<SunStudyInput>,

    solar_path: OverlaySlot,
    solar_path_key: InputKey<SolarPathInput>,
    solar_crossings: Option<SolarCrossings>,

    wind_field: OverlaySlot,
    wind_field_key: InputKey<WindFieldInput>,

    map_underlay: OverlaySlot,
    map_underlay_key: InputKey<MapUnderlayInput>,
    tile_zoom: Option<u8>,
    pending_tiles: Vec<Tagged<TileRequest>>,

    rng: StdRng,
}

impl Preview {
    /// Opens an empty preview.
    pub fn open(options: PreviewOptions) -> Self {
        Self::with_rng(options, StdRng::from_entropy())
    }

    /// Opens an empty preview with a seeded instance-jitter generator.
    pub fn open_seeded(options: PreviewOptions, seed: u64) -> Self {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(options: PreviewOptions, rng: StdRng) -> Self {
        let study_date = options
            .study_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let env = EnvironmentalState {
            time_of_day: options.clamp_time(EnvironmentalState::default().time_of_day),
            ..EnvironmentalState::default()
        };
        Self {
            options,
            study_date,
            scene: Scene::new(),
            layers: LayerSet::new(),
            env,
            generation: Generation::default(),
            status: LoadStatus::Empty,
            stats: IngestStats::default(),
            climate: ClimateStatus::Pending,
            climate_requested: false,
            lighting: Lighting::default(),
            sun_study_key: InputKey::default(),
            solar_path: OverlaySlot::new(OverlayKind::SolarPath),
            solar_path_key: InputKey::default(),
            solar_crossings: None,
            wind_field: OverlaySlot::new(OverlayKind::WindField),
            wind_field_key: InputKey::default(),
            map_underlay: OverlaySlot::new(OverlayKind::MapUnderlay),
            map_underlay_key: InputKey::default(),
            tile_zoom: None,
            pending_tiles: Vec::new(),
            rng,
        }
    }

    /// Disposes every node and returns to the empty state.
    ///
    /// Results of requests issued before closing are discarded on arrival.
    pub fn close(&mut self) {
        self.generation = self.generation.next();
        self.reset_scene();
        self.env.reset(None);
        self.status = LoadStatus::Empty;
        log::debug!("preview closed");
    }

    fn reset_scene(&mut self) {
        self.scene.clear();
        self.layers.clear_children();
        self.solar_path.forget();
        self.wind_field.forget();
        self.map_underlay.forget();
        self.pending_tiles.clear();
        self.tile_zoom = None;
        self.solar_crossings = None;
        self.lighting = Lighting::default();
        self.stats = IngestStats::default();
        self.climate = ClimateStatus::Pending;
        self.climate_requested = false;
        self.invalidate_overlays();
    }

    fn invalidate_overlays(&mut self) {
        self.sun_study_key.invalidate();
        self.solar_path_key.invalidate();
        self.wind_field_key.invalidate();
        self.map_underlay_key.invalidate();
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Replaces the scene with the contents of a payload.
    ///
    /// Starts a new generation, resets the environmental state and re-applies
    /// the layer flags to the new nodes. On error the preview is left empty.
    pub fn load_geometry(&mut self, payload: &GeometryPayload) -> Result<Generation> {
        self.generation = self.generation.next();
        self.reset_scene();

        let ingested = match ingest(payload) {
            Ok(ingested) => ingested,
            Err(e) => {
                self.env.reset(None);
                self.status = LoadStatus::Failed(e.to_string());
                log::error!("geometry load {} failed: {e}", self.generation.value());
                return Err(e);
            }
        };
        self.env.reset(Some(ingested.origin));
        self.env.time_of_day = self.options.clamp_time(self.env.time_of_day);

        for (i, batch) in ingested.batches.iter().enumerate() {
            let layer = batch.kind().layer();
            if batch.kind() == BatchKind::Surface {
                if let Some(subtype) = batch.descriptor() {
                    self.layers.register_subtype(subtype);
                }
            }
            for node in batch.scene_nodes(&format!("{} {i}", layer.name())) {
                let id = self.scene.insert(node);
                self.layers.assign(layer, id);
            }
        }

        for batch in synthesize(&ingested.instances, &mut self.rng) {
            let id = self.scene.insert(batch.scene_node());
            self.layers.assign(batch.category().layer(), id);
        }

        self.layers.apply(&mut self.scene);
        self.stats = ingested.stats;
        self.status = LoadStatus::Loaded;

        log::info!(
            "loaded geometry generation {}: {} batches, {} vertices, {} instances",
            self.generation.value(),
            self.stats.batch_count,
            self.stats.vertex_count,
            self.stats.instance_count
        );
        Ok(self.generation)
    }

    /// Records a failed geometry request.
    ///
    /// The preview shows nothing until the next successful load.
    pub fn fail_geometry_load(&mut self, error: impl std::fmt::Display) {
        self.generation = self.generation.next();
        self.reset_scene();
        self.env.reset(None);
        self.status = LoadStatus::Failed(error.to_string());
        log::error!("geometry request failed: {error}");
    }

    // ========================================================================
    // Climate
    // ========================================================================

    /// Issues the climate fetch for the current load.
    ///
    /// Returns `None` when nothing is loaded or a fetch was already issued
    /// for this load.
    pub fn begin_climate_fetch(&mut self) -> Option<FetchTicket> {
        if self.status != LoadStatus::Loaded || self.climate_requested {
            return None;
        }
        let origin = self.env.origin?;
        self.climate_requested = true;
        Some(FetchTicket {
            generation: self.generation,
            origin,
        })
    }

    /// Delivers the result of a climate fetch.
    ///
    /// Results for an older generation are discarded. `Ok(None)` and errors
    /// leave the wind field unavailable for this load. Returns true if the
    /// result was applied.
    pub fn complete_climate_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Option<ClimateData>, String>,
    ) -> bool {
        let Some(result) = Tagged::new(ticket.generation, result).accept(self.generation) else {
            return false;
        };
        self.climate = match result {
            Ok(Some(data)) => ClimateStatus::Available(data),
            Ok(None) => {
                log::warn!("no climate data for this site; wind field unavailable");
                ClimateStatus::Unavailable
            }
            Err(e) => {
                log::warn!("climate fetch failed: {e}; wind field unavailable");
                ClimateStatus::Unavailable
            }
        };
        true
    }

    // ========================================================================
    // Controls
    // ========================================================================

    /// Sets the time of day, clamped to the configured range.
    pub fn set_time_of_day(&mut self, hours: f32) {
        self.env.time_of_day = self.options.clamp_time(hours);
    }

    /// Sets the date used for solar computations.
    pub fn set_study_date(&mut self, date: NaiveDate) {
        self.study_date = date;
    }

    /// Drives the light from the sun position at the current time and date.
    pub fn set_sun_study(&mut self, enabled: bool) {
        self.env.sun_study = enabled;
    }

    /// Shows or hides the solar path with its compass.
    pub fn set_solar_path(&mut self, enabled: bool) {
        self.env.solar_path = enabled;
    }

    /// Shows or hides the wind arrow field.
    pub fn set_wind_field(&mut self, enabled: bool) {
        self.env.wind_field = enabled;
    }

    /// Shows or hides the map tiles under the model.
    pub fn set_map_underlay(&mut self, enabled: bool) {
        self.env.map_underlay = enabled;
    }

    /// Sets whether the default light casts shadows.
    pub fn set_default_shadows(&mut self, enabled: bool) {
        self.env.default_shadows = enabled;
    }

    /// Sets the group flag of a layer and updates node visibility.
    pub fn set_layer_visibility(&mut self, kind: LayerKind, visible: bool) {
        self.layers.set_visibility(kind, visible);
        self.layers.apply(&mut self.scene);
    }

    /// Sets the flag of a surface subtype and updates node visibility.
    pub fn set_surface_subtype_visibility(&mut self, subtype: &str, visible: bool) {
        self.layers.set_subtype_visibility(subtype, visible);
        self.layers.apply(&mut self.scene);
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Recomputes every overlay whose inputs changed since the last call.
    ///
    /// Returns the number of overlays recomputed. Overlay failures degrade
    /// to "no overlay" and are logged.
    pub fn prepare_frame(&mut self) -> usize {
        let bounds = self.scene.bounds();
        let mut recomputed = 0;

        if self.update_sun_study(bounds) {
            recomputed += 1;
        }
        if self.update_solar_path(bounds) {
            recomputed += 1;
        }
        if self.update_wind_field(bounds) {
            recomputed += 1;
        }
        if self.update_map_underlay(bounds) {
            recomputed += 1;
        }
        recomputed
    }

    fn update_sun_study(&mut self, bounds: Option<SceneBounds>) -> bool {
        let input = SunStudyInput {
            enabled: self.env.sun_study,
            default_shadows: self.env.default_shadows,
            time_of_day: self.env.time_of_day,
            date: self.study_date,
            origin: self.env.origin,
            bounds,
        };
        if !self.sun_study_key.update(input) {
            return false;
        }
        self.lighting = sun_study::compute(&input, &self.options).unwrap_or_else(|e| {
            log::warn!("sun study unavailable: {e}");
            Lighting::default()
        });
        true
    }

    fn update_solar_path(&mut self, bounds: Option<SceneBounds>) -> bool {
        let input = SolarPathInput {
            enabled: self.env.solar_path,
            time_of_day: self.env.time_of_day,
            date: self.study_date,
            origin: self.env.origin,
            bounds,
        };
        if !self.solar_path_key.update(input) {
            return false;
        }
        match solar_path::build(&input, &self.options) {
            Ok(Some(geometry)) => {
                self.solar_crossings = geometry
                    .first_visible()
                    .zip(geometry.last_visible())
                    .map(|(first, last)| SolarCrossings { first, last });
                self.solar_path.replace(&mut self.scene, geometry.nodes);
            }
            Ok(None) => {
                self.solar_crossings = None;
                self.solar_path.release(&mut self.scene);
            }
            Err(e) => {
                log::warn!("solar path unavailable: {e}");
                self.solar_crossings = None;
                self.solar_path.release(&mut self.scene);
            }
        }
        true
    }

    fn update_wind_field(&mut self, bounds: Option<SceneBounds>) -> bool {
        let sample = match &self.climate {
            ClimateStatus::Available(data) => Some(*data.sample_at(self.env.time_of_day)),
            ClimateStatus::Pending | ClimateStatus::Unavailable => None,
        };
        let input = WindFieldInput {
            enabled: self.env.wind_field,
            sample,
            bounds,
        };
        if !self.wind_field_key.update(input) {
            return false;
        }
        match wind_field::build(&input, &self.options) {
            Ok(Some(nodes)) => {
                self.wind_field.replace(&mut self.scene, nodes);
            }
            Ok(None) => self.wind_field.release(&mut self.scene),
            Err(e) => {
                log::warn!("wind field unavailable: {e}");
                self.wind_field.release(&mut self.scene);
            }
        }
        true
    }

    fn update_map_underlay(&mut self, bounds: Option<SceneBounds>) -> bool {
        let input = MapUnderlayInput {
            enabled: self.env.map_underlay,
            origin: self.env.origin,
            bounds,
        };
        if !self.map_underlay_key.update(input) {
            return false;
        }
        self.map_underlay.release(&mut self.scene);
        self.pending_tiles.clear();
        self.tile_zoom = None;

        let (true, Some(origin), Some(bounds)) = (input.enabled, input.origin, input.bounds) else {
            return true;
        };
        let plan = match map_underlay::plan(&bounds, origin, &self.options) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("map underlay unavailable: {e}");
                return true;
            }
        };

        let nodes = plan.tiles.iter().map(|t| t.scene_node()).collect();
        let ids = self.map_underlay.replace(&mut self.scene, nodes);
        self.pending_tiles = plan
            .tiles
            .into_iter()
            .zip(ids)
            .map(|(t, node)| {
                Tagged::new(
                    self.generation,
                    TileRequest {
                        z: t.z,
                        x: t.x,
                        y: t.y,
                        url: t.url,
                        node: *node,
                    },
                )
            })
            .collect();
        self.tile_zoom = Some(plan.zoom);
        log::debug!(
            "scheduled {} map tiles at zoom {}",
            self.pending_tiles.len(),
            plan.zoom
        );
        true
    }

    /// Takes the tile requests scheduled since the last call.
    pub fn take_tile_requests(&mut self) -> Vec<Tagged<TileRequest>> {
        std::mem::take(&mut self.pending_tiles)
    }

    /// Delivers a fetched tile texture.
    ///
    /// The texture is attached only if the request belongs to the current
    /// generation and its quad is still part of the underlay. Failed tiles
    /// stay as gaps. Returns true if the texture was attached.
    pub fn complete_tile(
        &mut self,
        request: Tagged<TileRequest>,
        texture: std::result::Result<TextureHandle, String>,
    ) -> bool {
        let Some(request) = request.accept(self.generation) else {
            return false;
        };
        let texture = match texture {
            Ok(texture) => texture,
            Err(e) => {
                log::debug!("tile {}/{}/{} failed: {e}", request.z, request.x, request.y);
                return false;
            }
        };
        if !self.map_underlay.nodes().contains(&request.node) {
            log::debug!("tile {}/{}/{} no longer shown", request.z, request.x, request.y);
            return false;
        }
        self.scene.attach_texture(request.node, texture).is_ok()
    }

    // ========================================================================
    // Render
    // ========================================================================

    /// Captures the current view and sends it to an image generator.
    ///
    /// Overlay helpers are hidden during the capture and restored afterwards.
    /// A capture failure is an error; a generator failure is reported in the
    /// returned outcome.
    pub fn request_render<S, G>(
        &mut self,
        surface: &mut S,
        generator: &mut G,
        prompt: &RenderPrompt,
    ) -> Result<RenderReport>
    where
        S: RenderSurface + ?Sized,
        G: ImageGenerator + ?Sized,
    {
        if self.status != LoadStatus::Loaded {
            return Err(SitescopeError::Capture("no geometry loaded".into()));
        }
        self.prepare_frame();

        let frame = capture_frame(
            surface,
            &mut self.scene,
            self.options.capture_width,
            self.options.capture_height,
        )
        .map_err(|e| {
            log::error!("frame capture failed: {e}");
            SitescopeError::from(e)
        })?;

        let prompt = prompt.text(self.env.time_of_day, &self.lighting);
        let outcome = generator.generate(&frame.png, &prompt);
        if outcome.is_success() {
            log::info!("render generated");
        } else {
            log::warn!("render generation failed: {outcome:?}");
        }
        Ok(RenderReport {
            frame,
            prompt,
            outcome,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the layer flags.
    #[must_use]
    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Returns the environmental state.
    #[must_use]
    pub fn environment(&self) -> &EnvironmentalState {
        &self.env
    }

    /// Returns the date used for solar computations.
    #[must_use]
    pub fn study_date(&self) -> NaiveDate {
        self.study_date
    }

    /// Returns the current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns the status of the last load.
    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Returns ingestion totals of the last load.
    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Returns climate availability.
    #[must_use]
    pub fn climate(&self) -> &ClimateStatus {
        &self.climate
    }

    /// Returns the lighting computed by the last [`prepare_frame`](Self::prepare_frame).
    #[must_use]
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Returns the solar path crossing times, if the path is shown.
    #[must_use]
    pub fn solar_crossings(&self) -> Option<SolarCrossings> {
        self.solar_crossings
    }

    /// Returns the zoom of the current map underlay.
    #[must_use]
    pub fn tile_zoom(&self) -> Option<u8> {
        self.tile_zoom
    }

    /// Returns the nodes currently owned by an overlay.
    #[must_use]
    pub fn overlay_nodes(&self, kind: OverlayKind) -> &[NodeId] {
        match kind {
            OverlayKind::SolarPath => self.solar_path.nodes(),
            OverlayKind::WindField => self.wind_field.nodes(),
            OverlayKind::MapUnderlay => self.map_underlay.nodes(),
        }
    }

    /// Returns the backend resources held by the scene.
    #[must_use]
    pub fn resource_counts(&self) -> ResourceCounts {
        self.scene.resource_counts()
    }
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("generation", &self.generation)
            .field("status", &self.status)
            .field("nodes", &self.scene.len())
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}
