use crate::parsers::{
    frames::{gradient_entry, node_entry, parse_frames},
    walls::parse_walls,
    ParseError, Result as FieldResult,
};
use linked_hash_map::LinkedHashMap;
use std::{
    collections::BTreeSet,
    fs::File,
    io::Read,
    ops::Deref,
    path::Path,
    str::FromStr,
};

/// Gradient magnitudes are divided by this before they are stored. Large gradients would
/// otherwise leave the rendered area. The raw value can't be recovered from a `FrameStore`.
pub const REDUCTION_FACTOR: f64 = 4.0;

/// Only nodes with this type tag are kept when reading a `.nod` file.
pub const PERSON_TAG: &str = "person";

/// A named entity read from one `;` separated entry of a frame line.
pub trait Record: Sized {
    /// Parses a single entry. `Ok(None)` means the entry is valid but filtered out.
    fn parse_entry(entry: &str) -> FieldResult<'_, Option<(&str, Self)>>;
}

/// A gradient sample. `position[2]` is the gradient value already divided by `REDUCTION_FACTOR`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gradient {
    pub position: [f64; 3],
}

impl Record for Gradient {
    fn parse_entry(entry: &str) -> FieldResult<'_, Option<(&str, Self)>> {
        gradient_entry(entry)
    }
}

/// A node of the simulation. Only nodes tagged as `person` exist in a store.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Node {
    pub position: [f64; 2],
}

impl Record for Node {
    fn parse_entry(entry: &str) -> FieldResult<'_, Option<(&str, Self)>> {
        node_entry(entry)
    }
}

/// One line of a frame file.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<R> {
    /// Position of the frame in the file, starting at 1.
    pub index: u32,
    /// Simulation time read from the line.
    pub time: f64,
    /// The step number written in the file. It's kept for inspection only, `index` is what
    /// identifies the frame.
    pub declared_step: f64,
    records: LinkedHashMap<String, R>, //LinkedHashMap keeps the order the records had in the line
}

impl<R> Frame<R> {
    pub(crate) fn new(index: u32, time: f64, declared_step: f64) -> Self {
        Self {
            index,
            time,
            declared_step,
            records: LinkedHashMap::new(),
        }
    }

    /// Returns the previous record if `name` was already in the frame.
    pub(crate) fn insert(&mut self, name: String, record: R) -> Option<R> {
        self.records.insert(name, record)
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names and records in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.records.iter().map(|(name, record)| (&name[..], record))
    }

    /// The presence set of the frame, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|name| &name[..])
    }
}

impl Frame<Gradient> {
    /// The point cloud of the frame, used by the surface import.
    pub fn points(&self) -> Vec<[f64; 3]> {
        self.records.values().map(|g| g.position).collect()
    }
}

/// Every frame of a `.gra` or `.nod` file. Built once and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStore<R> {
    frames: Vec<Frame<R>>,
}

pub type GradientStore = FrameStore<Gradient>;
pub type NodeStore = FrameStore<Node>;

impl<R: Record> FrameStore<R> {
    /// Returns a new `FrameStore` from `data`.
    pub fn from_data<T: Read>(mut data: T) -> Result<Self, ParseError> {
        let mut buffer = String::new();
        data.read_to_string(&mut buffer)?;
        buffer.parse()
    }

    /// Returns a new `FrameStore` from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        FrameStore::from_data(file)
    }
}

impl<R: Record> FromStr for FrameStore<R> {
    type Err = ParseError;

    fn from_str(content: &str) -> Result<Self, ParseError> {
        let frames = parse_frames(content)?;
        Ok(Self { frames })
    }
}

impl<R> FrameStore<R> {
    /// Number of frames. Frames are always indexed `1..=len()`.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Frame<R>> {
        let position = (index as usize).checked_sub(1)?;
        self.frames.get(position)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.get(index).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame<R>> {
        self.frames.iter()
    }

    /// Every name that appears in at least one frame.
    pub fn all_names(&self) -> BTreeSet<&str> {
        self.frames.iter().flat_map(|frame| frame.names()).collect()
    }

    /// Index of the first frame `name` appears in.
    pub fn first_appearance(&self, name: &str) -> Option<u32> {
        self.frames
            .iter()
            .find(|frame| frame.contains(name))
            .map(|frame| frame.index)
    }
}

/// A wall segment from `start` to `end` on the ground plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wall {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl Wall {
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }

    /// Size of the wall box relative to `start`, `height` being the box height.
    pub fn extent(&self, height: f64) -> [f64; 3] {
        [
            self.end[0] - self.start[0],
            self.end[1] - self.start[1],
            height,
        ]
    }
}

/// Walls of a `.wal` file in file order. Walls are static so they are not split in frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Walls(Vec<Wall>);

impl Walls {
    pub fn from_data<T: Read>(mut data: T) -> Result<Self, ParseError> {
        let mut buffer = String::new();
        data.read_to_string(&mut buffer)?;
        buffer.parse()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Walls::from_data(file)
    }
}

impl FromStr for Walls {
    type Err = ParseError;

    fn from_str(content: &str) -> Result<Self, ParseError> {
        parse_walls(content).map(Walls)
    }
}

impl Deref for Walls {
    type Target = [Wall];

    fn deref(&self) -> &[Wall] {
        &self.0
    }
}
