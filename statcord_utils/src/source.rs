use std::{fs, io, path::Path};

use walkdir::{DirEntry, WalkDir};

const SOURCE_EXTENSION: &str = "rs";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCount {
    pub files: usize,
    pub lines: usize,
}

/// Count lines of Rust source below `root`, skipping build output and hidden directories.
///
/// With a `target`, only files whose stem or one of whose parent directories is named
/// `target` are counted.
pub fn count_lines(root: &Path, target: Option<&str>) -> io::Result<LineCount> {
    let mut count = LineCount::default();

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e)) {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION)
        {
            continue;
        }

        if let Some(target) = target {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let stem_matches = path.file_stem().and_then(|s| s.to_str()) == Some(target);
            let dir_matches = relative
                .parent()
                .is_some_and(|parent| parent.iter().any(|part| part == target));

            if !stem_matches && !dir_matches {
                continue;
            }
        }

        let content = fs::read(path)?;
        count.files += 1;
        count.lines += String::from_utf8_lossy(&content).lines().count();
    }

    Ok(count)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || name == "target")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {\n}\n\n");
        write(dir.path(), "src/commands/profile.rs", "a\nb\n");
        write(dir.path(), "target/debug/build.rs", "x\ny\nz\n");
        write(dir.path(), ".git/hooks/hook.rs", "x\n");
        write(dir.path(), "README.md", "not counted\n");
        dir
    }

    #[test]
    fn counts_all_sources() {
        let dir = fixture();

        assert_eq!(
            count_lines(dir.path(), None).unwrap(),
            LineCount { files: 2, lines: 5 }
        );
    }

    #[test]
    fn counts_by_stem_or_directory() {
        let dir = fixture();

        assert_eq!(
            count_lines(dir.path(), Some("profile")).unwrap(),
            LineCount { files: 1, lines: 2 }
        );
        assert_eq!(
            count_lines(dir.path(), Some("commands")).unwrap(),
            LineCount { files: 1, lines: 2 }
        );
        assert_eq!(count_lines(dir.path(), Some("nothing")).unwrap(), LineCount::default());
    }
}
