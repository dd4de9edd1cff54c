// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Maps a diagram id to a file stem that is valid on every platform.
///
/// Ids that are already safe pass through unchanged; anything else becomes `~` followed by the
/// hex bytes of the id, which cannot collide with an unencoded stem.
fn encode_persisted_id_segment(segment: &str) -> String {
    if is_portable_file_stem(segment) {
        return segment.to_owned();
    }

    let mut stem = String::with_capacity(1 + segment.len() * 2);
    stem.push('~');
    for byte in segment.bytes() {
        stem.push_str(&format!("{byte:02x}"));
    }
    stem
}

fn is_portable_file_stem(stem: &str) -> bool {
    let reserved_edge = stem.starts_with(['~', '.']) || stem.ends_with([' ', '.']);
    let reserved_char = stem.chars().any(|ch| {
        ch.is_ascii_control() || matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
    });
    let device = stem.split('.').next().is_some_and(is_windows_device_name);
    !(reserved_edge || reserved_char || device)
}

fn is_windows_device_name(base: &str) -> bool {
    let upper = base.to_ascii_uppercase();
    match upper.as_bytes() {
        [b'C', b'O', b'N'] | [b'P', b'R', b'N'] | [b'A', b'U', b'X'] | [b'N', b'U', b'L'] => true,
        [b'C', b'O', b'M', digit] | [b'L', b'P', b'T', digit] => matches!(*digit, b'1'..=b'9'),
        _ => false,
    }
}

/// Makes sure `<root>/diagrams` is a real directory, creating it on first use.
fn ensure_diagrams_dir(root: &Path, dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(dir) {
        Ok(md) if md.file_type().is_symlink() => Err(StoreError::SymlinkRefused {
            path: dir.to_path_buf(),
        }),
        Ok(md) if md.is_dir() => Ok(()),
        Ok(_) => Err(StoreError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "expected directory"),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(StoreError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Replaces the record at `path` through a hidden temp file in the same directory and a rename,
/// so readers only ever see the old or the new record.
fn write_record_atomic(
    dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    if let Ok(md) = fs::symlink_metadata(path) {
        if md.file_type().is_symlink() {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".svcgraph.tmp.{file_name}.{}.{nanos}", std::process::id()));

    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    };

    let written = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(contents)?;
            if durability == WriteDurability::Durable {
                file.sync_all()?;
            }
            Ok(())
        });
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(&tmp_path)(source));
    }

    // std's rename replaces an existing target on every supported platform.
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error(path)(source));
    }

    #[cfg(unix)]
    {
        if durability == WriteDurability::Durable {
            fs::File::open(dir)
                .and_then(|handle| handle.sync_all())
                .map_err(io_error(dir))?;
        }
    }

    Ok(())
}
