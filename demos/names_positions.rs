use alchemist::NodeStore;
use std::{env, path};

fn print_names_and_positions(file_name: &str) {
    let base_path = path::PathBuf::from(
        env::var_os("CARGO_MANIFEST_DIR").expect("could not find cargo manifest dir"),
    );
    let nod_path = base_path.join(format!("tests/data/{}", file_name));
    let store = NodeStore::from_path(nod_path).expect("error loading nod file");

    for frame in store.iter() {
        println!("frame {} (t = {})", frame.index, frame.time);
        for (name, node) in frame.iter() {
            println!("    \"{}\" at {:?}", name, node.position);
        }
    }
}

fn main() {
    print_names_and_positions("crowd.nod");
}
