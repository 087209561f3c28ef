//! Resource provider integration tests

mod helpers;

use helpers::{capture_logs, create_resources, write, ResourceOptions};
use ltp_addon::resources::{get_provider, DefaultProvider, ResourceProvider, CUSTOM_PROVIDER_FILE};
use ltp_common::Error;
use tempfile::TempDir;

fn single_word_resources(options: ResourceOptions) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "lexicon", "hello\th @ l \"o U\n");
    if options.with_spelling {
        write(&dir, "spelling_lexicon", "h\t\"e I t S\n");
    }
    if options.with_unit_lists {
        write(&dir, "phonemes", "h\n@\nl\n\"o\nU\n");
        write(&dir, "graphemes", "h\ne\nl\no\n");
    }
    if options.with_word_lists {
        write(&dir, "train_words", "hello\n");
        write(&dir, "test_words", "hello\n");
    }
    dir
}

#[test]
fn test_provider() {
    let dir = single_word_resources(ResourceOptions::default());
    let provider = DefaultProvider::new(dir.path());

    assert_eq!(provider.lexicon(None).unwrap().len(), 1);
    assert_eq!(provider.lexicon(Some(&["world".to_string()][..])).unwrap().len(), 0);
    assert_eq!(provider.spelling_lexicon().unwrap().len(), 1);
    assert_eq!(provider.phonemes().unwrap().len(), 5);
    assert_eq!(provider.graphemes().unwrap().len(), 4);
    assert_eq!(provider.train_words().unwrap(), vec!["hello".to_string()]);
    assert_eq!(provider.test_words().unwrap(), Some(vec!["hello".to_string()]));
}

#[test]
fn test_provider_without_word_lists() {
    let dir = single_word_resources(ResourceOptions {
        with_word_lists: false,
        ..Default::default()
    });
    let provider = DefaultProvider::new(dir.path());

    assert_eq!(
        provider.train_words().unwrap().len(),
        provider.lexicon(None).unwrap().len()
    );
    assert!(provider.test_words().unwrap().is_none());
}

#[test]
fn test_provider_derives_unit_lists() {
    let dir = single_word_resources(ResourceOptions {
        with_unit_lists: false,
        ..Default::default()
    });
    let provider = DefaultProvider::new(dir.path());

    assert_eq!(
        provider.phonemes().unwrap(),
        vec!["\"o", "@", "U", "h", "l"]
    );
    assert_eq!(provider.graphemes().unwrap(), vec!["e", "h", "l", "o"]);
}

#[test]
fn test_provider_without_spelling() {
    let dir = single_word_resources(ResourceOptions {
        with_spelling: false,
        ..Default::default()
    });
    let provider = DefaultProvider::new(dir.path());

    assert!(matches!(provider.spelling_lexicon(), Err(Error::NotFound(_))));
}

#[test]
fn test_missing_lexicon_is_not_found() {
    let dir = TempDir::new().unwrap();
    let provider = DefaultProvider::new(dir.path());

    assert!(matches!(provider.lexicon(None), Err(Error::NotFound(_))));
    // derived inventories need the lexicon too
    assert!(matches!(provider.phonemes(), Err(Error::NotFound(_))));
}

#[test]
fn test_tagged_pronunciations() {
    let dir = create_resources(ResourceOptions::default());
    let provider = DefaultProvider::new(dir.path());

    let lexicon = provider.lexicon(None).unwrap();
    let read = lexicon.get("read").unwrap();
    assert_eq!(read.pronunciations().len(), 2);
    assert_eq!(read.pronunciations()[0].tag(), "");
    assert_eq!(read.pronunciations()[1].tag(), "past");
}

#[test]
fn test_provider_getter_defaults() {
    let dir = single_word_resources(ResourceOptions::default());
    let provider = get_provider(dir.path());
    assert_eq!(provider.lexicon(None).unwrap().len(), 1);
}

#[test]
fn test_custom_json_provider() {
    let dir = TempDir::new().unwrap();
    write(&dir, CUSTOM_PROVIDER_FILE, "provider = \"json\"\n");
    write(&dir, "dictionary", r#"[{"hello": ["h @ l \"o U"]}]"#);

    let provider = get_provider(dir.path());
    let lexicon = provider.lexicon(None).unwrap();
    assert_eq!(lexicon.len(), 1);
    assert_eq!(
        lexicon.get("hello").unwrap().pronunciation().to_string(),
        "h @ l \"o U"
    );
    assert_eq!(provider.phonemes().unwrap().len(), 5);
}

#[test]
fn test_custom_json_provider_lexicon_file_option() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        CUSTOM_PROVIDER_FILE,
        "provider = \"json\"\nlexicon_file = \"words.json\"\n",
    );
    write(&dir, "words.json", r#"[{"a": ["A"]}, {"b": ["B", "B2"]}]"#);

    let provider = get_provider(dir.path());
    assert_eq!(provider.lexicon(None).unwrap().len(), 2);
}

#[test]
fn test_unknown_provider_falls_back_to_default() {
    let dir = single_word_resources(ResourceOptions::default());
    write(&dir, CUSTOM_PROVIDER_FILE, "provider = \"sqlite\"\n");

    let (provider, logs) = capture_logs(|| get_provider(dir.path()));
    assert_eq!(provider.lexicon(None).unwrap().len(), 1);
    logs.assert_contains("Failed to load custom resource provider");
}

#[test]
fn test_unparsable_provider_file_falls_back_to_default() {
    let dir = single_word_resources(ResourceOptions::default());
    write(&dir, CUSTOM_PROVIDER_FILE, "provider = [\n");

    let (provider, logs) = capture_logs(|| get_provider(dir.path()));
    assert_eq!(provider.lexicon(None).unwrap().len(), 1);
    assert_eq!(logs.matching_at(tracing::Level::WARN, "using default").len(), 1);
}
