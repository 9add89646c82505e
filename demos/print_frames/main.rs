use alchemist::{FrameListener, GradientStore, NodeStore, Session, Walls};
use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

fn print_session<R, W: Write>(out: &mut W, mut session: Session<R>) -> io::Result<()> {
    for frame in 1..=session.store().len() as u32 {
        match session.on_frame_changed(frame) {
            Ok(diff) => writeln!(
                out,
                "frame {}: create {:?} show {:?} hide {:?}",
                frame, diff.to_create, diff.to_show_or_move, diff.to_hide
            )?,
            Err(err) => writeln!(out, "{}", err)?,
        }
    }
    Ok(())
}

fn do_it(path: &Path, output_dir: &Path) -> io::Result<()> {
    let extension = match path.extension().and_then(|e| e.to_str()) {
        Some(extension) => extension,
        None => return Ok(()),
    };
    let file_name = match path.file_name() {
        Some(file_name) => file_name.to_string_lossy().into_owned(),
        None => return Ok(()),
    };

    let output_path = output_dir.join(format!("output_{}.txt", file_name));
    let mut out = BufWriter::new(File::create(&output_path)?);

    let result = match extension {
        "gra" => GradientStore::from_path(path)
            .map(|store| print_session(&mut out, Session::new(store))),
        "nod" => {
            NodeStore::from_path(path).map(|store| print_session(&mut out, Session::new(store)))
        }
        "wal" => Walls::from_path(path).map(|walls| {
            walls.iter().enumerate().try_for_each(|(i, wall)| {
                writeln!(out, "wall{}: {:?} -> {:?}", i, wall.start, wall.end)
            })
        }),
        _ => return Ok(()),
    };

    match result {
        Ok(written) => written?,
        Err(err) => {
            log::error!("error when loading {}: {}", path.display(), err);
            return Ok(());
        }
    }

    out.flush()?;
    log::info!("done: {}", file_name);

    Ok(())
}

pub fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let base_path = PathBuf::from(
        env::var_os("CARGO_MANIFEST_DIR").expect("could not find cargo manifest dir"),
    );
    let input = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| base_path.join("tests/data"));
    let output_dir = base_path.join("demos/print_frames/output");
    std::fs::create_dir_all(&output_dir)?;

    for entry in WalkDir::new(input) {
        let entry = entry?;
        if entry.path().is_file() {
            do_it(entry.path(), &output_dir)?;
        }
    }

    Ok(())
}
