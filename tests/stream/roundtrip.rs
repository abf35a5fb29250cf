//! Round-Trip Tests
//!
//! Serialize/deserialize through buffers, shared streams, and real files.

use crate::common::{
    fixture_registry, sample_atom, sample_residue, AtomParams, ForceFieldBase, ResidueTemplate,
};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use stele::{
    deserialize, deserialize_any, deserialize_from_slice, serialize, serialize_to_vec, StreamError,
    TypeRegistry, HEADER_SIZE,
};
use tempfile::tempdir;

// ============================================================================
// Basic Round-Trips
// ============================================================================

#[test]
fn typed_roundtrip_preserves_value() {
    let registry = fixture_registry();
    let bytes = serialize_to_vec(&registry, &sample_residue()).unwrap();
    let read: ResidueTemplate = deserialize_from_slice(&registry, &bytes).unwrap();
    assert_eq!(read, sample_residue());
}

#[test]
fn bincode_payload_roundtrip_preserves_value() {
    let registry = fixture_registry();
    let bytes = serialize_to_vec(&registry, &sample_atom()).unwrap();
    let read: AtomParams = deserialize_from_slice(&registry, &bytes).unwrap();
    assert_eq!(read, sample_atom());
}

#[test]
fn empty_collections_roundtrip() {
    let registry = fixture_registry();
    let empty = ResidueTemplate {
        name: String::new(),
        atoms: Vec::new(),
    };
    let bytes = serialize_to_vec(&registry, &empty).unwrap();
    let read: ResidueTemplate = deserialize_from_slice(&registry, &bytes).unwrap();
    assert_eq!(read, empty);
}

// ============================================================================
// Sequential Objects on One Stream
// ============================================================================

#[test]
fn multiple_objects_share_one_stream() {
    let registry = fixture_registry();

    let mut buf = Vec::new();
    serialize(&registry, &mut buf, &sample_atom()).unwrap();
    serialize(&registry, &mut buf, &sample_residue()).unwrap();
    serialize(&registry, &mut buf, &ForceFieldBase).unwrap();

    let mut cursor = Cursor::new(buf);
    let atom: AtomParams = deserialize(&registry, &mut cursor).unwrap();
    let residue: ResidueTemplate = deserialize(&registry, &mut cursor).unwrap();
    let _base: ForceFieldBase = deserialize(&registry, &mut cursor).unwrap();

    assert_eq!(atom, sample_atom());
    assert_eq!(residue, sample_residue());
    assert_eq!(cursor.position(), cursor.get_ref().len() as u64);
}

#[test]
fn dynamic_decode_walks_a_mixed_stream() {
    let registry = fixture_registry();

    let mut buf = Vec::new();
    serialize(&registry, &mut buf, &sample_residue()).unwrap();
    serialize(&registry, &mut buf, &sample_atom()).unwrap();

    let mut cursor = Cursor::new(buf);

    let first = deserialize_any(&registry, &mut cursor).unwrap();
    assert_eq!(first.type_name(), "tests::ResidueTemplate");
    assert_eq!(*first.downcast::<ResidueTemplate>().unwrap(), sample_residue());

    let second = deserialize_any(&registry, &mut cursor).unwrap();
    assert!(second.is::<AtomParams>());
    assert!(!second.is::<ResidueTemplate>());
}

// ============================================================================
// File-Backed Streams
// ============================================================================

#[test]
fn roundtrip_through_a_real_file() {
    let registry = fixture_registry();
    let dir = tempdir().unwrap();
    let path = dir.path().join("residues.stele");

    {
        let mut file = File::create(&path).unwrap();
        serialize(&registry, &mut file, &sample_residue()).unwrap();
        serialize(&registry, &mut file, &sample_atom()).unwrap();
        file.sync_all().unwrap();
    }

    let mut file = File::open(&path).unwrap();
    let residue: ResidueTemplate = deserialize(&registry, &mut file).unwrap();
    let atom: AtomParams = deserialize(&registry, &mut file).unwrap();
    assert_eq!(residue, sample_residue());
    assert_eq!(atom, sample_atom());

    let mut rest = Vec::new();
    file.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn version_mismatch_leaves_file_position_after_header() {
    let writer_registry = fixture_registry();
    let dir = tempdir().unwrap();
    let path = dir.path().join("stale.stele");

    {
        let mut file = File::create(&path).unwrap();
        serialize(&writer_registry, &mut file, &sample_atom()).unwrap();
    }

    // A newer build bumped AtomParams to version 2.
    let reader_registry = TypeRegistry::new();
    reader_registry.register("tests::AtomParams", 2).unwrap();

    let mut file = File::open(&path).unwrap();
    let err = deserialize::<AtomParams>(&reader_registry, &mut file).unwrap_err();
    assert!(matches!(err, StreamError::VersionMismatch { .. }));
    assert_eq!(
        file.seek(SeekFrom::Current(0)).unwrap(),
        HEADER_SIZE as u64
    );
}

// ============================================================================
// Version Mismatch Semantics
// ============================================================================

#[test]
fn reregistered_version_bump_rejects_old_streams() {
    // Writer at version 1.
    let writer = TypeRegistry::new();
    writer.register_type::<AtomParams>().unwrap();
    let bytes = serialize_to_vec(&writer, &sample_atom()).unwrap();

    // Reader registered the same name at version 2.
    let reader = TypeRegistry::new();
    reader.register("tests::AtomParams", 2).unwrap();

    let err = deserialize_from_slice::<AtomParams>(&reader, &bytes).unwrap_err();
    match err {
        StreamError::VersionMismatch {
            type_name,
            found,
            expected,
            ..
        } => {
            assert_eq!(type_name, "tests::AtomParams");
            assert_eq!(found, 1);
            assert_eq!(expected, 2);
        }
        other => panic!("expected VersionMismatch, got {other:?}"),
    }
}

#[test]
fn mismatch_error_message_names_both_versions() {
    let writer = TypeRegistry::new();
    writer.register_type::<AtomParams>().unwrap();
    let bytes = serialize_to_vec(&writer, &sample_atom()).unwrap();

    let reader = TypeRegistry::new();
    reader.register("tests::AtomParams", 4).unwrap();

    let err = deserialize_from_slice::<AtomParams>(&reader, &bytes).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("tests::AtomParams"));
    assert!(msg.contains("found version 1"));
    assert!(msg.contains("expected version 4"));
}

#[test]
fn writer_needs_no_decoder_reader_does() {
    // Name-only registration is enough to write.
    let writer = TypeRegistry::new();
    writer.register("tests::AtomParams", 1).unwrap();
    let bytes = serialize_to_vec(&writer, &sample_atom()).unwrap();

    // And a typed read works without a decoder entry too.
    let reader = TypeRegistry::new();
    reader.register("tests::AtomParams", 1).unwrap();
    let atom: AtomParams = deserialize_from_slice(&reader, &bytes).unwrap();
    assert_eq!(atom, sample_atom());

    // Only dynamic dispatch requires the decode capability.
    let mut cursor = Cursor::new(bytes);
    let err = deserialize_any(&reader, &mut cursor).unwrap_err();
    assert!(matches!(err, StreamError::NoDecoder { .. }));
}
