use crate::lexicon::model::{MAGIC, VERSION};
use crate::lexicon::{Lexicon, LexiconError, TaggerModel, TransitionMatrix};

fn sample_model() -> TaggerModel {
    let mut lexicon = Lexicon::new();
    lexicon.add_entry("dog", "NN", "dog", 10);
    lexicon.add_entry("barks", "VBZ", "bark", 5);
    let suffix_lexicon = lexicon.build_suffix_lexicon(3);
    let mut matrix = TransitionMatrix::new();
    matrix.increment_unigram("NN", 10);
    matrix.increment_bigram("NN", "VBZ", 5);
    matrix.increment_trigram(".", "NN", "VBZ", 4);
    TaggerModel::new(lexicon, suffix_lexicon, matrix)
}

#[test]
fn bytes_round_trip() {
    let model = sample_model();
    let bytes = model.to_bytes().unwrap();
    assert_eq!(&bytes[..4], MAGIC);
    assert_eq!(bytes[4], VERSION);
    let decoded = TaggerModel::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn rejects_bad_headers() {
    assert!(matches!(
        TaggerModel::from_bytes(b"PT"),
        Err(LexiconError::InvalidHeader)
    ));
    assert!(matches!(
        TaggerModel::from_bytes(b"XXXX\x01rest"),
        Err(LexiconError::InvalidMagic)
    ));
    assert!(matches!(
        TaggerModel::from_bytes(b"PTMD\x09rest"),
        Err(LexiconError::UnsupportedVersion(9))
    ));
}

#[test]
fn truncated_body_is_a_deserialize_error() {
    let bytes = sample_model().to_bytes().unwrap();
    let err = TaggerModel::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, LexiconError::Deserialize(_)));
}

#[test]
fn save_and_open_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let model = sample_model();
    model.save(&path).unwrap();
    assert!(!path.with_extension("tmp").exists());
    let opened = TaggerModel::open(&path).unwrap();
    assert_eq!(opened, model);
}
