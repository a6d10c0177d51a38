use codeshrink::core::engine;
use codeshrink::{minify, minify_html, minify_js, minify_json, MinificationLevel, MinificationOptions, SupportedLanguage};

const JSON_SAMPLES: &[&str] = &[
    r#"{ "a" : 1, "b" : [ true, null, 2.5 ], "c" : { "d" : "x  y" } }"#,
    "[ ]",
    "\"just a string\"",
    "  42  ",
    r#"{"z": 1, "a": {"nested": ["é", "\n"]}}"#,
];

#[test]
fn test_json_round_trip() {
    let options = MinificationOptions::default();
    for sample in JSON_SAMPLES {
        let result = minify_json(sample, &options);
        assert!(result.errors.is_empty(), "{}: {:?}", sample, result.errors);
        let before: serde_json::Value = serde_json::from_str(sample).unwrap();
        let after: serde_json::Value = serde_json::from_str(&result.minified).unwrap();
        assert_eq!(before, after);
    }
}

#[test]
fn test_errors_always_return_original() {
    let inputs = [
        ("{ broken", SupportedLanguage::Json),
        ("[1, 2,", SupportedLanguage::Json),
        ("function f( { return 1", SupportedLanguage::Javascript),
        ("<div><p>unclosed", SupportedLanguage::Html),
        ("a { color: red", SupportedLanguage::Css),
        ("SELECT  *  FROM t -- c", SupportedLanguage::Sql),
    ];
    for level in [MinificationLevel::Light, MinificationLevel::Moderate, MinificationLevel::Aggressive] {
        let options = MinificationOptions::default().with_level(level);
        for (content, language) in inputs {
            let result = minify(content, language, &options);
            if !result.errors.is_empty() {
                assert_eq!(result.minified, content);
            }
        }
    }
}

#[test]
fn test_minified_js_is_stable() {
    let options = MinificationOptions {
        remove_console_log: true,
        ..MinificationOptions::default()
    };
    let source = r#"
        // setup
        function greet(name) {
            console.log("hello", name);
            debugger;
            return "Hi, " + name;
        }
        /* done */
        greet("x");
    "#;

    let once = minify_js(source, &options);
    let twice = minify_js(&once.minified, &options);
    assert!(twice.minified.len() <= once.minified.len());
    for output in [&once.minified, &twice.minified] {
        assert!(!output.contains("console.log"));
        assert!(!output.contains("debugger"));
        assert!(output.contains("\"Hi, \""));
    }
}

#[test]
fn test_html_comments_removed() {
    let html = "<div>\n  <!-- c -->\n  <span>text</span>\n</div>";
    let result = minify_html(html, &MinificationOptions::default());
    assert!(!result.minified.contains("<!-- c -->"));
    assert!(result.minified.contains("<span>text</span>"));
}

#[test]
fn test_light_level_keeps_more_than_aggressive() {
    let css = "a {\n  margin: 0px;\n  font-weight: bold;\n}\n";
    let light = engine::minify_css(css, &MinificationOptions::default().with_level(MinificationLevel::Light));
    let aggressive = engine::minify_css(css, &MinificationOptions::default().with_level(MinificationLevel::Aggressive));
    assert!(aggressive.minified.len() <= light.minified.len());
    assert!(aggressive.minified.contains("font-weight:700"));
}

#[test]
fn test_generic_languages_never_fail_on_plain_text() {
    let options = MinificationOptions::default();
    for language in SupportedLanguage::ALL {
        // Markup only protects attribute values, JSON has its own grammar
        if matches!(language, SupportedLanguage::Json | SupportedLanguage::Html | SupportedLanguage::Xml) {
            continue;
        }
        let result = minify("value  =  1  # note\n\n\nother = 'a  b'\n", language, &options);
        assert!(result.errors.is_empty(), "{}: {:?}", language, result.errors);
        assert!(result.minified.contains("a  b"), "{} touched a string literal", language);
    }
}

#[test]
fn test_quotes_in_comments_never_swallow_code() {
    let options = MinificationOptions::default();
    let cases = [
        ("/* it's */ x = 'a'; /* end */ y = 1;", SupportedLanguage::Javascript, "x='a';y=1;"),
        ("// press the ` key\nconst a = 1;\nconst b = `x`;", SupportedLanguage::Typescript, "const a=1;const b=`x`;"),
        ("/* don't */ a { content: 'x'; } /* it's */ b { c: d }", SupportedLanguage::Css, "a{content:'x';}b{c:d}"),
        (
            "<!-- see <pre> -->\n<pre>code</pre>\n<p>important</p>\n<!-- end -->\n<p>tail</p>",
            SupportedLanguage::Html,
            "<pre>code</pre><p>important</p><p>tail</p>",
        ),
        (
            "<r>\n  <!-- <![CDATA[ -->\n  <b>x</b>\n  <c><![CDATA[ y ]]></c>\n</r>",
            SupportedLanguage::Xml,
            "<r><b>x</b><c><![CDATA[ y ]]></c></r>",
        ),
        (
            "# see '''\nx = 1\ny = 2\ndef f():\n    '''doc'''\n    return x",
            SupportedLanguage::Python,
            "x = 1\ny = 2\ndef f():\n    '''doc'''\n    return x",
        ),
        ("-- it's\nSELECT 1; SELECT 'x';", SupportedLanguage::Sql, "SELECT 1;SELECT 'x';"),
        ("# it's here\necho 'a'\necho b", SupportedLanguage::Shell, "echo 'a'\necho b"),
    ];
    for (source, language, expected) in cases {
        let result = minify(source, language, &options);
        assert!(result.errors.is_empty(), "{}: {:?}", language, result.errors);
        assert_eq!(result.minified, expected, "{}", language);
    }
}

#[test]
fn test_js_regex_literal_with_slashes() {
    let result = minify_js("const parts = url.split(/\\/\\//); run();", &MinificationOptions::default());
    assert!(result.errors.is_empty());
    assert_eq!(result.minified, "const parts=url.split(/\\/\\//);run();");
}

#[test]
fn test_unlexable_js_comes_back_unchanged() {
    let source = "const s = 'open\nrun(); // done";
    let result = minify_js(source, &MinificationOptions::default());
    assert_eq!(result.minified, source);
    assert!(!result.errors.is_empty());
}

#[test]
fn test_comment_only_input_ratio() {
    let source = "// nothing but a comment";
    let result = minify_js(source, &MinificationOptions::default());
    assert!(result.minified.is_empty());
    assert_eq!(result.minified_size, 0);
    assert_eq!(result.compression_ratio, source.len() as f64);
}
