use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions we accept as raw asset images.
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Recursively collect image files under `root`, sorted by path.
///
/// A missing root is not an error: categories without staged assets are
/// allowed, so the caller just gets an empty list.
pub fn discover_images(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_image_file(path))
        .collect();

    paths.sort();
    paths
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_root_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_images(&dir.path().join("nope"));
        assert!(found.is_empty());
    }

    #[test]
    fn finds_images_recursively_and_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.png"), b"").unwrap();
        fs::write(root.join("sub/b.JPG"), b"").unwrap();
        fs::write(root.join("readme.txt"), b"").unwrap();
        fs::write(root.join("no_extension"), b"").unwrap();

        let found = discover_images(root);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }

    #[test]
    fn results_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("z.png"), b"").unwrap();
        fs::write(root.join("a.png"), b"").unwrap();
        fs::write(root.join("m.jpeg"), b"").unwrap();

        let found = discover_images(root);
        let mut sorted = found.clone();
        sorted.sort();
        assert_eq!(found, sorted);
    }
}
