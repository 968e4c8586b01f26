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

use crate::{Archive, ArchiveSpec, DirectoryArchive, Error, TEMPFILE_PATH};

#[test]
fn write_creates_subdirectories() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let mut archive = DirectoryArchive::open(&ArchiveSpec::write(dir.path())).unwrap();

    archive.write("/a/b/c", b"deep").unwrap();

    assert!(dir.path().join("a/b/c").is_file());
    assert_eq!(archive.read_as_bytes("/a/b/c").unwrap(), b"deep");
}

#[test]
fn namelist_lists_regular_files_only() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let mut archive = DirectoryArchive::open(&ArchiveSpec::write(dir.path())).unwrap();

    archive.write("/topic/1", b"x").unwrap();
    archive.write("/topic/2", b"y").unwrap();
    std::fs::create_dir_all(dir.path().join("empty/dir")).unwrap();

    let names = archive.namelist().unwrap();

    assert_eq!(names, ["/topic/1", "/topic/2"]);
}

#[test]
fn read_missing_is_not_found() {
    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let mut archive = DirectoryArchive::open(&ArchiveSpec::write(dir.path())).unwrap();

    let err = archive.read_as_bytes("/nope").unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn open_missing_directory_for_read_fails() {
    let err = DirectoryArchive::open(&ArchiveSpec::read("/no/such/protobag/dir")).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn tempfile_sentinel_allocates_unique_root() {
    let a = DirectoryArchive::open(&ArchiveSpec::write(TEMPFILE_PATH)).unwrap();
    let b = DirectoryArchive::open(&ArchiveSpec::write(TEMPFILE_PATH)).unwrap();

    assert_ne!(a.root(), b.root());
    assert!(a.root().is_dir());

    std::fs::remove_dir_all(a.root()).unwrap();
    std::fs::remove_dir_all(b.root()).unwrap();
}

#[test]
fn names_are_interchangeable_with_memory() {
    use crate::MemoryArchive;

    let dir = tempfile::Builder::new().prefix("protobag").tempdir().unwrap();
    let mut disk = DirectoryArchive::open(&ArchiveSpec::write(dir.path())).unwrap();
    let mut memory = MemoryArchive::new();

    disk.write("a/b", b"bytes").unwrap();
    memory.write("a/b", b"bytes").unwrap();

    // Both implementations canonicalize identically, so the name reported
    // by one reads the same bytes from the other.
    for name in disk.namelist().unwrap() {
        assert_eq!(
            disk.read_as_bytes(&name).unwrap(),
            memory.read_as_bytes(&name).unwrap()
        );
    }
}
