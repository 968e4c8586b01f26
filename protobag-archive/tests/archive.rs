// MIT License
//
// Copyright (c) 2024 The protobag developers
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

use std::collections::HashSet;
use std::path::PathBuf;

use protobag_archive::{
    create_archive_from_dir, infer_format, open_archive, unpack_archive_to_dir, ArchiveSpec,
    Error, Format,
};

fn write_fixture(spec: &ArchiveSpec) {
    let mut archive = open_archive(spec).unwrap();

    archive.write("/topic/1", b"one").unwrap();
    archive.write("/topic/2", b"two").unwrap();
    archive.write("/other/nested/3", b"three").unwrap();
    archive.close().unwrap();
}

fn check_fixture(spec: &ArchiveSpec) {
    let mut archive = open_archive(spec).unwrap();

    let names: HashSet<String> = archive.namelist().unwrap().into_iter().collect();
    let expected: HashSet<String> = ["/topic/1", "/topic/2", "/other/nested/3"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, expected);

    assert_eq!(archive.read_as_bytes("/topic/1").unwrap(), b"one");
    assert_eq!(archive.read_as_bytes("/topic/2").unwrap(), b"two");
    assert_eq!(archive.read_as_bytes("/other/nested/3").unwrap(), b"three");

    // Reads canonicalize the same way writes did.
    assert_eq!(archive.read_as_bytes("topic/1").unwrap(), b"one");

    let err = archive.read_as_bytes("/missing").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn directory_roundtrip() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();

    write_fixture(&ArchiveSpec::write(dir.path()));
    check_fixture(&ArchiveSpec::read(dir.path()));
}

#[test]
fn tar_roundtrip() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let path = dir.path().join("bag.tar");

    write_fixture(&ArchiveSpec::write(&path));
    check_fixture(&ArchiveSpec::read(&path));
}

#[test]
fn zip_roundtrip() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let path = dir.path().join("bag.zip");

    write_fixture(&ArchiveSpec::write(&path));
    check_fixture(&ArchiveSpec::read(&path));
}

#[test]
fn memory_roundtrip() {
    let handle = protobag_archive::MemoryArchive::new();

    write_fixture(&ArchiveSpec::default().with_memory_archive(handle.clone()));
    check_fixture(&ArchiveSpec::read("unused").with_memory_archive(handle));
}

#[test]
fn format_inference() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();

    assert_eq!(infer_format(dir.path()), Some(Format::Directory));
    assert_eq!(
        infer_format(&PathBuf::from("/tmp/bag.tar")),
        Some(Format::Tar)
    );
    assert_eq!(
        infer_format(&PathBuf::from("/tmp/bag.zip")),
        Some(Format::Zip)
    );
    assert_eq!(infer_format(&PathBuf::from("/tmp/bag.xyz")), None);
}

#[test]
fn open_without_format_fails() {
    let err = match open_archive(&ArchiveSpec::write("/tmp/protobag-no-ext")) {
        Ok(_) => panic!("expected an error"),
        Err(err) => err,
    };

    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn close_is_idempotent() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let path = dir.path().join("bag.tar");

    let mut archive = open_archive(&ArchiveSpec::write(&path)).unwrap();
    archive.write("/a", b"x").unwrap();
    archive.close().unwrap();
    archive.close().unwrap();

    // A write after close is rejected.
    let err = archive.write("/b", b"y").unwrap_err();
    assert!(matches!(err, Error::Closed));
}

#[test]
fn pack_and_unpack_streams_every_entry() {
    let src = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    std::fs::create_dir_all(src.path().join("sub")).unwrap();
    std::fs::write(src.path().join("a"), b"alpha").unwrap();
    std::fs::write(src.path().join("sub/b"), vec![7u8; 100_000]).unwrap();

    let work = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();

    for name in &["packed.tar", "packed.zip"] {
        let archive_path = work.path().join(name);
        create_archive_from_dir(src.path(), &archive_path, None).unwrap();

        let out = work.path().join(format!("{}.out", name));
        unpack_archive_to_dir(&archive_path, &out).unwrap();

        assert_eq!(std::fs::read(out.join("a")).unwrap(), b"alpha");
        assert_eq!(std::fs::read(out.join("sub/b")).unwrap(), vec![7u8; 100_000]);
    }
}
