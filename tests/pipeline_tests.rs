use indoc::indoc;
use resgen::{
    DirTree, Error, FileTree, OutputDirs, Pipeline, Platform, ResourceKind, Settings, Tiers,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn strings_xml(entries: &[(&str, &str)]) -> String {
    let mut xml = String::from("<resources>\n");
    for (key, value) in entries {
        xml.push_str(&format!("    <string name=\"{}\">{}</string>\n", key, value));
    }
    xml.push_str("</resources>\n");
    xml
}

/// A shared tier plus an own tier covering every resource kind.
fn fixture() -> (TempDir, TempDir) {
    let lower = tempfile::tempdir().unwrap();
    write(
        lower.path(),
        "base/strings.xml",
        strings_xml(&[("title", "Shared title"), ("shared_only", "From library")]),
    );

    let own = tempfile::tempdir().unwrap();
    write(
        own.path(),
        "base/strings.xml",
        strings_xml(&[("title", "App title"), ("greeting", "Hello")]),
    );
    write(
        own.path(),
        "ru/strings.xml",
        strings_xml(&[("greeting", "Привет"), ("ru_only", "Только")]),
    );
    write(
        own.path(),
        "base/plurals.xml",
        indoc! {r#"
            <resources>
                <plural name="items">
                    <item quantity="one">%d item</item>
                    <item quantity="other">%d items</item>
                </plural>
            </resources>
        "#},
    );
    write(
        own.path(),
        "base/colors.xml",
        indoc! {r#"
            <resources>
                <color name="accent">#B02743</color>
                <color name="surface">
                    <light>#FFFFFF</light>
                    <dark>#121212</dark>
                </color>
            </resources>
        "#},
    );
    write(own.path(), "images/logo.png", b"logo-1x");
    write(own.path(), "images/logo@2x.png", b"logo-2x");
    write(own.path(), "fonts/Inter-Regular.ttf", b"font");
    write(own.path(), "assets/texts/intro.txt", b"intro");
    (lower, own)
}

fn run(
    lower: &Path,
    own: &Path,
    settings: Settings,
    platform: Platform,
    output: &Path,
) -> Result<PathBuf, Error> {
    let lower = DirTree::new(lower);
    let own = DirTree::new(own);
    let upper = DirTree::empty();
    let sources: Tiers<&dyn FileTree> = Tiers::new(&lower, &own, &upper);
    Pipeline::new(settings, sources).run(
        platform,
        &OutputDirs::new(output.join("res"), output.join("src")),
    )
}

fn settings() -> Settings {
    Settings::new().with_package_name("com.example.app")
}

/// Relative path → content of every file below `root`.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn visit(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(root, &path, out);
            } else {
                out.insert(
                    path.strip_prefix(root).unwrap().to_path_buf(),
                    fs::read(&path).unwrap(),
                );
            }
        }
    }
    let mut out = BTreeMap::new();
    visit(root, root, &mut out);
    out
}

#[test]
fn test_every_platform_generates_from_fixture() {
    let (lower, own) = fixture();
    for platform in Platform::ALL {
        let output = tempfile::tempdir().unwrap();
        let source = run(lower.path(), own.path(), settings(), platform, output.path())
            .unwrap_or_else(|err| panic!("{} failed: {}", platform, err));
        assert_eq!(source, output.path().join("src/com/example/app/MR.kt"));
        let code = fs::read_to_string(&source).unwrap();
        for kind in ResourceKind::ALL {
            assert!(
                code.contains(&format!("object {} {{", kind.object_name())),
                "{} binding lacks {}",
                platform,
                kind
            );
        }
    }
}

#[test]
fn test_generation_is_idempotent() {
    let (lower, own) = fixture();
    for platform in Platform::ALL {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        run(lower.path(), own.path(), settings(), platform, first.path()).unwrap();
        run(lower.path(), own.path(), settings(), platform, second.path()).unwrap();
        let before = snapshot(first.path());
        assert_eq!(before, snapshot(second.path()), "{} output differs", platform);

        run(lower.path(), own.path(), settings(), platform, first.path()).unwrap();
        assert_eq!(before, snapshot(first.path()), "{} rerun changed output", platform);
    }
}

#[test]
fn test_own_tier_overrides_lower_tier() {
    let (lower, own) = fixture();
    let output = tempfile::tempdir().unwrap();
    run(lower.path(), own.path(), settings(), Platform::Android, output.path()).unwrap();

    let values =
        fs::read_to_string(output.path().join("res/values/multiplatform_strings.xml")).unwrap();
    assert!(values.contains(r#"<string name="title">App title</string>"#));
    assert!(values.contains(r#"<string name="shared_only">From library</string>"#));
    assert!(!values.contains("Shared title"));
}

#[test]
fn test_upper_tier_overrides_own_tier() {
    let (lower, own) = fixture();
    let upper = tempfile::tempdir().unwrap();
    write(
        upper.path(),
        "base/strings.xml",
        strings_xml(&[("title", "Platform title")]),
    );
    let output = tempfile::tempdir().unwrap();

    let trees = (
        DirTree::new(lower.path()),
        DirTree::new(own.path()),
        DirTree::new(upper.path()),
    );
    let sources: Tiers<&dyn FileTree> = Tiers::new(&trees.0, &trees.1, &trees.2);
    Pipeline::new(settings(), sources)
        .generate(Platform::Jvm, output.path())
        .unwrap();

    let bundle = fs::read_to_string(
        output
            .path()
            .join("localization/com_example_app_strings.properties"),
    )
    .unwrap();
    assert!(bundle.contains("title=Platform title\n"));
}

#[test]
fn test_canonical_keys_come_from_base_locale() {
    let (lower, own) = fixture();
    let output = tempfile::tempdir().unwrap();
    let source = run(lower.path(), own.path(), settings(), Platform::Common, output.path()).unwrap();
    let code = fs::read_to_string(source).unwrap();

    assert!(code.contains("public val greeting: StringResource"));
    assert!(code.contains("public val shared_only: StringResource"));
    assert!(!code.contains("ru_only"));
    assert!(code.starts_with("// Generated resource accessors. Do not edit.\npackage com.example.app\n"));
    assert!(code.contains("public expect object MR {"));
}

#[test]
fn test_four_x_only_image_fails_on_apple_only() {
    let own = tempfile::tempdir().unwrap();
    write(own.path(), "base/strings.xml", strings_xml(&[("title", "Title")]));
    write(own.path(), "images/hero@4x.png", b"hero");
    let lower = tempfile::tempdir().unwrap();

    let output = tempfile::tempdir().unwrap();
    let err = run(lower.path(), own.path(), settings(), Platform::Apple, output.path())
        .unwrap_err();
    let violations = err.violations().expect("validation error");
    assert_eq!(violations.keys(), vec!["hero"]);
    let message = err.to_string();
    assert!(message.contains("`hero`"));
    assert!(message.contains("1x, 2x and 3x"));

    for platform in [Platform::Android, Platform::Jvm, Platform::Js] {
        let output = tempfile::tempdir().unwrap();
        run(lower.path(), own.path(), settings(), platform, output.path())
            .unwrap_or_else(|err| panic!("{} failed: {}", platform, err));
    }
}

#[test]
fn test_strict_line_breaks_setting() {
    let own = tempfile::tempdir().unwrap();
    write(
        own.path(),
        "base/strings.xml",
        "<resources><string name=\"poem\">Roses are red,\n    violets are blue</string></resources>",
    );
    let lower = tempfile::tempdir().unwrap();

    let relaxed = tempfile::tempdir().unwrap();
    run(lower.path(), own.path(), settings(), Platform::Jvm, relaxed.path()).unwrap();
    let bundle = fs::read_to_string(
        relaxed
            .path()
            .join("res/localization/com_example_app_strings.properties"),
    )
    .unwrap();
    assert_eq!(bundle, "poem=Roses are red, violets are blue\n");

    let strict = tempfile::tempdir().unwrap();
    run(
        lower.path(),
        own.path(),
        settings().with_strict_line_breaks(true),
        Platform::Jvm,
        strict.path(),
    )
    .unwrap();
    let bundle = fs::read_to_string(
        strict
            .path()
            .join("res/localization/com_example_app_strings.properties"),
    )
    .unwrap();
    assert_eq!(bundle, "poem=Roses are red,\\n    violets are blue\n");
}

#[test]
fn test_errors_from_several_kinds_are_aggregated() {
    let own = tempfile::tempdir().unwrap();
    write(
        own.path(),
        "base/strings.xml",
        strings_xml(&[("same", "same"), ("fine", "Fine")]),
    );
    write(own.path(), "de/colors.xml", "<resources><color name=\"c\">#FFFFFF</color></resources>");
    let lower = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let err = run(lower.path(), own.path(), settings(), Platform::Android, output.path())
        .unwrap_err();
    match err {
        Error::Aggregate(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().any(|e| e.violations().is_some()));
            assert!(errors.iter().any(|e| matches!(
                e,
                Error::MissingBaseLocale {
                    kind: ResourceKind::Colors
                }
            )));
        }
        other => panic!("expected aggregate error, got {:?}", other),
    }
    assert!(!output.path().join("src").exists());
}
