use crate::store::FrameStore;
use log::debug;
use std::collections::BTreeSet;
use thiserror::Error;

/// Returned when a frame change targets a frame the store doesn't have. Nothing is modified when
/// this happens, the caller is expected to leave the scene as it was.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[error("frame {frame} is not in the store")]
pub struct FrameNotFound {
    pub frame: u32,
}

/// What has to happen to the scene to go from one frame to another. The three lists never share a
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityDiff {
    /// Active in the previous frame and absent from the target frame. Sorted.
    pub to_hide: Vec<String>,
    /// Present in the target frame and never created before, in frame order.
    pub to_create: Vec<String>,
    /// Present in the target frame and already created, in frame order. These become visible and
    /// take the position of the target frame.
    pub to_show_or_move: Vec<String>,
}

impl VisibilityDiff {
    pub fn is_empty(&self) -> bool {
        self.to_hide.is_empty() && self.to_create.is_empty() && self.to_show_or_move.is_empty()
    }
}

/// Computes the diff to reach `target` when `previous` is the active set and `created` holds every
/// name that was ever created. Objects are never destroyed, so whether a name is created is decided
/// against the whole history while hiding only looks at the previous frame.
pub fn resolve<R>(
    store: &FrameStore<R>,
    previous: &BTreeSet<String>,
    created: &BTreeSet<String>,
    target: u32,
) -> Result<VisibilityDiff, FrameNotFound> {
    let frame = store
        .get(target)
        .ok_or(FrameNotFound { frame: target })?;

    let to_hide = previous
        .iter()
        .filter(|name| !frame.contains(name))
        .cloned()
        .collect();

    let (to_show_or_move, to_create) = frame
        .names()
        .map(str::to_owned)
        .partition(|name| created.contains(name));

    Ok(VisibilityDiff {
        to_hide,
        to_create,
        to_show_or_move,
    })
}

/// Receives the frame changes of the host's animation loop.
pub trait FrameListener {
    /// Computes the diff for `frame` without changing anything.
    fn resolve(&self, frame: u32) -> Result<VisibilityDiff, FrameNotFound>;

    /// Records that `diff` was applied and `frame` is now the current frame.
    fn commit(&mut self, frame: u32, diff: &VisibilityDiff);

    fn on_frame_changed(&mut self, frame: u32) -> Result<VisibilityDiff, FrameNotFound> {
        let diff = self.resolve(frame)?;
        self.commit(frame, &diff);
        Ok(diff)
    }
}

/// State of one imported animation: the store and what the scene currently looks like.
#[derive(Debug, Clone)]
pub struct Session<R> {
    store: FrameStore<R>,
    active: BTreeSet<String>,
    created: BTreeSet<String>, //only grows
    current: Option<u32>,
}

impl<R> Session<R> {
    pub fn new(store: FrameStore<R>) -> Self {
        Self {
            store,
            active: BTreeSet::new(),
            created: BTreeSet::new(),
            current: None,
        }
    }

    /// Starts a session over objects the scene already has, for example from an earlier import
    /// using the same names. They count as created and visible so the first frame change reuses
    /// them and hides the ones the frame doesn't have.
    pub fn with_existing<I>(store: FrameStore<R>, existing: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let created: BTreeSet<String> = existing.into_iter().collect();
        Self {
            store,
            active: created.clone(),
            created,
            current: None,
        }
    }

    pub fn store(&self) -> &FrameStore<R> {
        &self.store
    }

    /// Names visible in the current frame.
    pub fn active(&self) -> &BTreeSet<String> {
        &self.active
    }

    /// Names that were created at some point, visible or not.
    pub fn created(&self) -> &BTreeSet<String> {
        &self.created
    }

    pub fn current_frame(&self) -> Option<u32> {
        self.current
    }

    /// Records objects the scene now has although their diff was never committed, after a host
    /// failed halfway through a frame change. New objects are visible so they also become active.
    pub(crate) fn mark_created<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        for name in names {
            self.active.insert(name.clone());
            self.created.insert(name);
        }
    }
}

impl<R> FrameListener for Session<R> {
    fn resolve(&self, frame: u32) -> Result<VisibilityDiff, FrameNotFound> {
        resolve(&self.store, &self.active, &self.created, frame)
    }

    fn commit(&mut self, frame: u32, diff: &VisibilityDiff) {
        debug!(
            "frame {}: {} hidden, {} created, {} shown",
            frame,
            diff.to_hide.len(),
            diff.to_create.len(),
            diff.to_show_or_move.len()
        );

        self.created.extend(diff.to_create.iter().cloned());
        self.active = diff
            .to_create
            .iter()
            .chain(diff.to_show_or_move.iter())
            .cloned()
            .collect();
        self.current = Some(frame);
    }
}

/// Visibility of the per frame surfaces of a gradient surface import. Surface `n` exists from the
/// start and is the only one visible on frame `n`. Names in the diffs are full object names.
#[derive(Debug, Clone)]
pub struct SurfaceTimeline {
    prefix: String,
    frame_count: u32,
    visible: BTreeSet<u32>,
}

impl SurfaceTimeline {
    /// All surfaces start visible, as they are right after being created.
    pub fn new(prefix: impl Into<String>, frame_count: u32) -> Self {
        Self {
            prefix: prefix.into(),
            frame_count,
            visible: (1..=frame_count).collect(),
        }
    }

    pub fn object_name(&self, frame: u32) -> String {
        format!("{}{}", self.prefix, frame)
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn visible(&self) -> impl Iterator<Item = u32> + '_ {
        self.visible.iter().copied()
    }
}

impl FrameListener for SurfaceTimeline {
    fn resolve(&self, frame: u32) -> Result<VisibilityDiff, FrameNotFound> {
        if frame == 0 || frame > self.frame_count {
            return Err(FrameNotFound { frame });
        }

        Ok(VisibilityDiff {
            to_hide: self
                .visible
                .iter()
                .filter(|&&visible| visible != frame)
                .map(|&visible| self.object_name(visible))
                .collect(),
            to_create: Vec::new(),
            to_show_or_move: vec![self.object_name(frame)],
        })
    }

    fn commit(&mut self, frame: u32, _diff: &VisibilityDiff) {
        self.visible.clear();
        self.visible.insert(frame);
    }
}
