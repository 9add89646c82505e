//! The boundary with the 3D application. `SceneHost` is everything the importers need from it,
//! the rest of this module turns parsed files and visibility diffs into calls on a host.

use crate::{
    config::{Material, SceneConfig},
    error::{Error, Result},
    runtime::{FrameListener, Session, SurfaceTimeline, VisibilityDiff},
    store::{Frame, FrameStore, Gradient, Node, Record, Walls},
};
use log::{info, warn};
use std::path::Path;

/// The shapes the importers ask a host to create.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Gradient samples.
    Sphere { radius: f64 },
    /// Nodes.
    Cone {
        vertices: u32,
        radius: f64,
        depth: f64,
    },
    /// A wall, `extent` is relative to the object location.
    Box { extent: [f64; 3], material: Material },
    /// A gradient surface, to be skinned by the host.
    PointCloud { points: Vec<[f64; 3]> },
}

/// A 3D application able to show the imported data. A host call either succeeds or fails, the
/// importers never retry.
pub trait SceneHost {
    type Error: std::fmt::Display;

    fn instantiate(
        &mut self,
        name: &str,
        primitive: &Primitive,
        location: [f64; 3],
    ) -> std::result::Result<(), Self::Error>;

    fn set_location(&mut self, name: &str, location: [f64; 3])
        -> std::result::Result<(), Self::Error>;

    /// Changes both the interactive and the render visibility.
    fn set_visible(&mut self, name: &str, visible: bool) -> std::result::Result<(), Self::Error>;

    fn register_frame_handler(&mut self, handler: &str) -> std::result::Result<(), Self::Error>;

    fn unregister_frame_handler(&mut self, handler: &str) -> std::result::Result<(), Self::Error>;

    /// Names of the existing objects starting with `prefix`.
    fn object_names(&self, prefix: &str) -> Vec<String>;
}

/// A record kind the scene can show, one object per record name.
pub trait Placeable: Record {
    /// Name the frame handler of this kind is registered with.
    const HANDLER: &'static str;

    fn prefix(config: &SceneConfig) -> &str;

    fn primitive(config: &SceneConfig) -> Primitive;

    fn location(&self, config: &SceneConfig) -> [f64; 3];
}

impl Placeable for Gradient {
    const HANDLER: &'static str = "alchemist_gradients";

    fn prefix(config: &SceneConfig) -> &str {
        &config.gradients.prefix
    }

    fn primitive(config: &SceneConfig) -> Primitive {
        Primitive::Sphere {
            radius: config.gradients.sphere_radius,
        }
    }

    fn location(&self, _config: &SceneConfig) -> [f64; 3] {
        self.position
    }
}

impl Placeable for Node {
    const HANDLER: &'static str = "alchemist_nodes";

    fn prefix(config: &SceneConfig) -> &str {
        &config.nodes.prefix
    }

    fn primitive(config: &SceneConfig) -> Primitive {
        Primitive::Cone {
            vertices: config.nodes.cone_vertices,
            radius: config.nodes.cone_radius,
            depth: config.nodes.cone_depth,
        }
    }

    fn location(&self, config: &SceneConfig) -> [f64; 3] {
        [self.position[0], self.position[1], config.nodes.elevation]
    }
}

pub const SURFACE_HANDLER: &str = "alchemist_surfaces";

/// Applies a diff computed for `frame`. Names in the diff are record names, objects are named
/// `<prefix><record name>`.
///
/// Every record name whose object was instantiated is pushed to `created`, including when a
/// later host call fails.
pub fn apply_diff<R: Placeable, H: SceneHost>(
    host: &mut H,
    config: &SceneConfig,
    frame: &Frame<R>,
    diff: &VisibilityDiff,
    created: &mut Vec<String>,
) -> Result<()> {
    let prefix = R::prefix(config);

    for name in &diff.to_hide {
        host.set_visible(&format!("{}{}", prefix, name), false)
            .map_err(Error::host)?;
    }

    if !diff.to_create.is_empty() {
        let primitive = R::primitive(config);
        for (name, record) in diff
            .to_create
            .iter()
            .filter_map(|name| frame.get(name).map(|record| (name, record)))
        {
            let object = format!("{}{}", prefix, name);
            host.instantiate(&object, &primitive, record.location(config))
                .map_err(Error::host)?;
            created.push(name.clone());
            host.set_visible(&object, true).map_err(Error::host)?;
        }
    }

    for (name, record) in diff
        .to_show_or_move
        .iter()
        .filter_map(|name| frame.get(name).map(|record| (name, record)))
    {
        let object = format!("{}{}", prefix, name);
        host.set_location(&object, record.location(config))
            .map_err(Error::host)?;
        host.set_visible(&object, true).map_err(Error::host)?;
    }

    Ok(())
}

/// Applies a diff whose names are already object names. Nothing is created or moved.
pub fn apply_visibility<H: SceneHost>(host: &mut H, diff: &VisibilityDiff) -> Result<()> {
    for name in &diff.to_hide {
        host.set_visible(name, false).map_err(Error::host)?;
    }
    for name in &diff.to_show_or_move {
        host.set_visible(name, true).map_err(Error::host)?;
    }

    Ok(())
}

/// Unregisters a frame handler. Failures are logged and otherwise ignored.
pub fn detach<H: SceneHost>(host: &mut H, handler: &str) {
    if let Err(err) = host.unregister_frame_handler(handler) {
        warn!("could not unregister frame handler {}: {}", handler, err);
    }
}

/// Loads Alchemist exports into a `SceneHost`. Files are parsed completely before the host is
/// touched so a broken file never leaves objects behind.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    pub config: SceneConfig,
}

impl Importer {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Reads the `SceneConfig` from a TOML file.
    pub fn from_config_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(SceneConfig::from_path(path)?))
    }

    /// Imports a frame file, creates the objects of frame 1 and registers the frame handler.
    /// Objects left by an earlier import with the same prefix are reused.
    pub fn frames<R, H, P>(&self, host: &mut H, path: P) -> Result<Session<R>>
    where
        R: Placeable,
        H: SceneHost,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let store = FrameStore::<R>::from_path(path).map_err(|source| Error::Import {
            path: path.to_owned(),
            source,
        })?;

        let prefix = R::prefix(&self.config);
        let existing = host
            .object_names(prefix)
            .into_iter()
            .filter_map(|object| object.strip_prefix(prefix).map(str::to_owned));
        let mut session = Session::with_existing(store, existing);

        if session.store().is_empty() {
            warn!("{} has no frames", path.display());
        } else {
            self.advance(host, &mut session, 1)?;
        }
        host.register_frame_handler(R::HANDLER)
            .map_err(Error::host)?;

        info!(
            "imported {} frames from {}",
            session.store().len(),
            path.display()
        );
        Ok(session)
    }

    pub fn gradients<H: SceneHost, P: AsRef<Path>>(
        &self,
        host: &mut H,
        path: P,
    ) -> Result<Session<Gradient>> {
        self.frames(host, path)
    }

    pub fn nodes<H: SceneHost, P: AsRef<Path>>(
        &self,
        host: &mut H,
        path: P,
    ) -> Result<Session<Node>> {
        self.frames(host, path)
    }

    /// Moves a session to `frame`. When the frame is unknown the scene and the session are left
    /// as they were. When the host fails the session stays on its previous frame but keeps the
    /// objects created so far, so the same frame can be retried.
    pub fn advance<R: Placeable, H: SceneHost>(
        &self,
        host: &mut H,
        session: &mut Session<R>,
        frame: u32,
    ) -> Result<VisibilityDiff> {
        let diff = session.resolve(frame)?;
        let mut created = Vec::new();
        let applied = match session.store().get(frame) {
            Some(target) => apply_diff(host, &self.config, target, &diff, &mut created),
            None => Ok(()),
        };
        if let Err(err) = applied {
            warn!(
                "frame {} applied partially, {} objects created",
                frame,
                created.len()
            );
            session.mark_created(created);
            return Err(err);
        }
        session.commit(frame, &diff);

        Ok(diff)
    }

    /// Imports a gradient file as one point cloud per frame, all created up front, and shows the
    /// surface of frame 1.
    pub fn surfaces<H: SceneHost, P: AsRef<Path>>(
        &self,
        host: &mut H,
        path: P,
    ) -> Result<SurfaceTimeline> {
        let path = path.as_ref();
        let store = FrameStore::<Gradient>::from_path(path).map_err(|source| Error::Import {
            path: path.to_owned(),
            source,
        })?;

        let mut timeline = SurfaceTimeline::new(
            self.config.surfaces.prefix.clone(),
            store.len() as u32,
        );
        for frame in store.iter() {
            let primitive = Primitive::PointCloud {
                points: frame.points(),
            };
            host.instantiate(&timeline.object_name(frame.index), &primitive, [0.0; 3])
                .map_err(Error::host)?;
        }

        if !store.is_empty() {
            self.advance_surfaces(host, &mut timeline, 1)?;
        }
        host.register_frame_handler(SURFACE_HANDLER)
            .map_err(Error::host)?;

        info!(
            "imported {} surfaces from {}",
            timeline.frame_count(),
            path.display()
        );
        Ok(timeline)
    }

    pub fn advance_surfaces<H: SceneHost>(
        &self,
        host: &mut H,
        timeline: &mut SurfaceTimeline,
        frame: u32,
    ) -> Result<VisibilityDiff> {
        let diff = timeline.resolve(frame)?;
        apply_visibility(host, &diff)?;
        timeline.commit(frame, &diff);

        Ok(diff)
    }

    /// Imports a wall file. Walls don't change over time so no frame handler is registered.
    pub fn walls<H: SceneHost, P: AsRef<Path>>(&self, host: &mut H, path: P) -> Result<Walls> {
        let path = path.as_ref();
        let walls = Walls::from_path(path).map_err(|source| Error::Import {
            path: path.to_owned(),
            source,
        })?;

        let config = &self.config.walls;
        for (i, wall) in walls.iter().enumerate() {
            let primitive = Primitive::Box {
                extent: wall.extent(config.height),
                material: config.material,
            };
            let location = [wall.start[0], wall.start[1], 0.0];
            host.instantiate(&format!("{}{}", config.prefix, i), &primitive, location)
                .map_err(Error::host)?;
        }

        info!("imported {} walls from {}", walls.len(), path.display());
        Ok(walls)
    }
}
