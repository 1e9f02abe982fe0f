//! Candidate tiles read from a directory on disk.
//!
//! Available when the `image-io` feature is enabled.

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::feature::FeatureExtractor;
use crate::image::io::load_gray_image;
use crate::rank::{Candidate, RankReport, Ranker};
use crate::util::{TileMatchError, TileMatchResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily decoded tiles from the files directly inside one directory.
///
/// Entries are listed up front, sorted by file name, and decoded one at a
/// time as the iterator is advanced. Subdirectories are not visited and no
/// extension filter is applied: files that are not images become failed
/// candidates, which the ranker skips.
#[derive(Debug, Default)]
pub struct TileDirectory {
    paths: std::vec::IntoIter<PathBuf>,
}

impl TileDirectory {
    /// Lists the regular files in `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> TileMatchResult<Self> {
        let dir = dir.as_ref();
        let unavailable = |reason: String| TileMatchError::DirectoryUnavailable {
            path: dir.display().to_string(),
            reason,
        };
        if !dir.is_dir() {
            return Err(unavailable("not a directory".to_string()));
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Dangling links and similar per-entry failures are not tiles.
                Err(err) if err.depth() > 0 => continue,
                Err(err) => return Err(unavailable(err.to_string())),
            };
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        Ok(Self {
            paths: paths.into_iter(),
        })
    }

    /// Like [`TileDirectory::open`], but a directory that cannot be listed
    /// becomes an empty stream after one warning on `sink`.
    pub fn open_or_empty<P: AsRef<Path>>(dir: P, sink: &dyn DiagnosticSink) -> Self {
        let dir = dir.as_ref();
        match Self::open(dir) {
            Ok(tiles) => tiles,
            Err(err) => {
                let location = dir.display().to_string();
                let reason = match &err {
                    TileMatchError::DirectoryUnavailable { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                sink.record(&Diagnostic::SourceUnavailable {
                    location: &location,
                    reason: &reason,
                });
                Self::default()
            }
        }
    }

    /// Paths not yet yielded.
    pub fn remaining(&self) -> &[PathBuf] {
        self.paths.as_slice()
    }
}

fn candidate_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Iterator for TileDirectory {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let path = self.paths.next()?;
        Some(Candidate {
            name: candidate_name(&path),
            image: load_gray_image(&path),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

impl ExactSizeIterator for TileDirectory {}

impl<E: FeatureExtractor> Ranker<E> {
    /// Loads the scene from `scene_path` and ranks every tile in `tiles_dir`.
    ///
    /// The directory is only listed once the scene has decoded; an unreadable
    /// scene ends the run with the invalid-scene result.
    pub fn find_best_tile<P, Q>(
        &self,
        scene_path: P,
        tiles_dir: Q,
        sink: &dyn DiagnosticSink,
    ) -> RankReport
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let scene = load_gray_image(scene_path);
        let tiles = if scene.is_ok() {
            TileDirectory::open_or_empty(tiles_dir, sink)
        } else {
            TileDirectory::default()
        };
        self.find_best_match(scene, tiles, sink)
    }
}

/// Ranks the tiles in `tiles_dir` against `scene_path` with default settings.
pub fn find_best_tile<P, Q>(scene_path: P, tiles_dir: Q, sink: &dyn DiagnosticSink) -> RankReport
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    Ranker::default().find_best_tile(scene_path, tiles_dir, sink)
}
