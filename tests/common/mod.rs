#![allow(dead_code)]

use alchemist::{Primitive, SceneHost};
use std::{collections::BTreeMap, env, fmt, path::PathBuf};

pub fn data_path(file_name: &str) -> PathBuf {
    PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("could not find cargo manifest dir"))
        .join("tests/data")
        .join(file_name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub primitive: Primitive,
    pub location: [f64; 3],
    pub visible: bool,
}

#[derive(Debug)]
pub struct HostError(pub String);

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An in memory scene that records what the importers do to it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub objects: BTreeMap<String, Object>,
    pub handlers: Vec<String>,
    pub instantiated: Vec<String>,
    pub fail_unregister: bool,
    /// The next `instantiate` of this name fails, once.
    pub fail_instantiate: Option<String>,
}

impl RecordingHost {
    pub fn object(&self, name: &str) -> &Object {
        self.objects
            .get(name)
            .unwrap_or_else(|| panic!("no object named {}", name))
    }

    pub fn visible(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|(_, object)| object.visible)
            .map(|(name, _)| &name[..])
            .collect()
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut Object, HostError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| HostError(format!("no object named {}", name)))
    }
}

impl SceneHost for RecordingHost {
    type Error = HostError;

    fn instantiate(
        &mut self,
        name: &str,
        primitive: &Primitive,
        location: [f64; 3],
    ) -> Result<(), HostError> {
        if self.fail_instantiate.as_deref() == Some(name) {
            self.fail_instantiate = None;
            return Err(HostError("transient".to_owned()));
        }
        if self.objects.contains_key(name) {
            return Err(HostError(format!("{} already exists", name)));
        }
        self.objects.insert(
            name.to_owned(),
            Object {
                primitive: primitive.clone(),
                location,
                visible: true,
            },
        );
        self.instantiated.push(name.to_owned());
        Ok(())
    }

    fn set_location(&mut self, name: &str, location: [f64; 3]) -> Result<(), HostError> {
        self.object_mut(name)?.location = location;
        Ok(())
    }

    fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), HostError> {
        self.object_mut(name)?.visible = visible;
        Ok(())
    }

    fn register_frame_handler(&mut self, handler: &str) -> Result<(), HostError> {
        self.handlers.push(handler.to_owned());
        Ok(())
    }

    fn unregister_frame_handler(&mut self, handler: &str) -> Result<(), HostError> {
        if self.fail_unregister {
            return Err(HostError("handler list is locked".to_owned()));
        }
        self.handlers.retain(|registered| registered != handler);
        Ok(())
    }

    fn object_names(&self, prefix: &str) -> Vec<String> {
        self.objects
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }
}
