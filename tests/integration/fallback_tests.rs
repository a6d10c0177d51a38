use codeshrink::{AdvancedMinifier, MinificationOptions, SupportedLanguage};
use std::sync::Arc;

#[test]
fn test_javascript_backend_output() {
    let minifier = AdvancedMinifier::new();
    let source = "export function add(first, second) {\n    // sum\n    return first + second;\n}\n";
    let result = minifier.minify(source, SupportedLanguage::Javascript, &MinificationOptions::default());

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.minified.len() < source.len());
    assert!(result.minified.contains("export"));
    assert!(!result.minified.contains("// sum"));
}

#[test]
fn test_unparsable_javascript_falls_back_to_basic_engine() {
    let minifier = AdvancedMinifier::new();
    let source = "let = ;   // broken\nfoo(  1 )";
    let result = minifier.minify(source, SupportedLanguage::Javascript, &MinificationOptions::default());

    assert!(result.errors.is_empty());
    assert!(result.warnings[0].contains("used the basic minifier instead"));
    assert!(!result.minified.contains("broken"));
}

#[test]
fn test_css_and_html_backends() {
    let minifier = AdvancedMinifier::new();
    let options = MinificationOptions::default();

    let css = minifier.minify("a {\n  color: red;\n}\n", SupportedLanguage::Css, &options);
    assert!(css.errors.is_empty());
    assert!(css.minified.contains("color:red"));

    let html = minifier.minify(
        "<div>\n  <!-- note -->\n  <p>hello</p>\n</div>\n",
        SupportedLanguage::Html,
        &options,
    );
    assert!(html.errors.is_empty());
    assert!(html.minified.contains("hello"));
    assert!(!html.minified.contains("note"));
}

#[test]
fn test_concurrent_first_use_loads_once() {
    let minifier = Arc::new(AdvancedMinifier::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let minifier = minifier.clone();
            std::thread::spawn(move || {
                let css = format!(".c{} {{ margin : 0 ; }}", i);
                minifier.minify(&css, SupportedLanguage::Css, &MinificationOptions::default())
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!(result.errors.is_empty());
    }
    let status = minifier.backend_status();
    assert!(status.iter().any(|(name, loaded)| *name == "lightningcss" && *loaded));
}

#[test]
fn test_typescript_uses_basic_engine() {
    let minifier = AdvancedMinifier::new();
    let result = minifier.minify(
        "const x: number = 1;   // n\n",
        SupportedLanguage::Typescript,
        &MinificationOptions::default(),
    );
    assert_eq!(result.minified, "const x:number=1;");
    assert!(minifier.backend_status().iter().all(|(_, loaded)| !loaded));
}
