//! Generation of the per-question Python test modules.
//!
//! These are built with a plain string buffer instead of a template: most of
//! the content depends on the marking item kind, and the escaping rules are
//! Python's, not a template engine's.

use itertools::Itertools;
use serde_json::Value;

use crate::config::{AutograderConfig, MarkingItem, MarkingItemKind, Question};

const INDENT: &str = "        ";

/// Render `tests/test_question_<number>.py` for one question.
pub fn render_question_module(
    config: &AutograderConfig,
    question: &Question,
    number: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\"\"\"Tests for Question {}: {}.\"\"\"\n\n",
        number,
        docstring_escape(&question.name)
    ));
    out.push_str("import inspect\n");
    out.push_str("import os\n");
    out.push_str("import subprocess\n");
    out.push_str("import sys\n");
    out.push_str("import unittest\n\n");
    out.push_str("import timeout_decorator\n");
    out.push_str(
        "from gradescope_utils.autograder_utils.decorators import number, visibility, weight\n\n",
    );
    out.push_str("SOURCE_DIR = os.environ.get(\"AUTOGRADER_SOURCE\", \"/autograder/source\")\n\n\n");
    out.push_str("def _load_module(file_name):\n");
    out.push_str("    import importlib\n\n");
    out.push_str("    if SOURCE_DIR not in sys.path:\n");
    out.push_str("        sys.path.insert(0, SOURCE_DIR)\n");
    out.push_str("    return importlib.import_module(os.path.splitext(file_name)[0])\n\n\n");
    out.push_str(&format!("class TestQuestion{}(unittest.TestCase):\n", number));
    out.push_str(&format!(
        "    \"\"\"{}\"\"\"\n",
        docstring_escape(&question.name)
    ));

    for (index, item) in question.marking_items.iter().enumerate() {
        let item_number = index + 1;
        out.push('\n');
        out.push_str(&format!("    @weight({})\n", item.total_mark));
        out.push_str(&format!("    @number(\"{}.{}\")\n", number, item_number));
        out.push_str(&format!("    @visibility(\"{}\")\n", item.visibility));
        out.push_str(&format!(
            "    @timeout_decorator.timeout({})\n",
            item.time_limit
        ));
        out.push_str(&format!("    def test_item_{}(self):\n", item_number));
        out.push_str(&format!(
            "        \"\"\"{}\"\"\"\n",
            docstring_escape(&item.label(item_number))
        ));
        out.push_str(&render_item_body(config, item));
    }
    out
}

fn render_item_body(config: &AutograderConfig, item: &MarkingItem) -> String {
    match item.kind {
        MarkingItemKind::FileExists => render_file_exists(item),
        MarkingItemKind::OutputComparison => render_output_comparison(config, item),
        MarkingItemKind::SignatureCheck => render_signature_check(item),
        MarkingItemKind::FunctionTest => render_function_test(item),
        MarkingItemKind::ClassTest => render_class_test(item),
    }
}

fn render_file_exists(item: &MarkingItem) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}path = os.path.join(SOURCE_DIR, {})\n",
        INDENT,
        py_str(&item.target_file)
    ));
    out.push_str(&format!(
        "{}self.assertTrue(os.path.isfile(path), {})\n",
        INDENT,
        py_str(&format!(
            "Required file {} was not submitted",
            item.target_file
        ))
    ));
    out
}

fn render_output_comparison(config: &AutograderConfig, item: &MarkingItem) -> String {
    let expected = normalized_expected_output(config, item);
    let mut out = String::new();
    out.push_str(&format!(
        "{}target = os.path.join(SOURCE_DIR, {})\n",
        INDENT,
        py_str(&item.target_file)
    ));
    out.push_str(&format!("{}try:\n", INDENT));
    out.push_str(&format!("{}    completed = subprocess.run(\n", INDENT));
    out.push_str(&format!("{}        [sys.executable, target],\n", INDENT));
    out.push_str(&format!(
        "{}        input={},\n",
        INDENT,
        py_str(&item.expected_input)
    ));
    out.push_str(&format!("{}        capture_output=True,\n", INDENT));
    out.push_str(&format!("{}        text=True,\n", INDENT));
    out.push_str(&format!("{}        timeout={},\n", INDENT, item.time_limit));
    out.push_str(&format!("{}    )\n", INDENT));
    out.push_str(&format!("{}except subprocess.TimeoutExpired:\n", INDENT));
    out.push_str(&format!(
        "{}    self.fail({})\n",
        INDENT,
        py_str(&format!(
            "Program timed out after {} seconds",
            item.time_limit
        ))
    ));
    out.push_str(&format!("{}if completed.returncode != 0:\n", INDENT));
    out.push_str(&format!(
        "{}    self.fail('Program exited with an error: ' + completed.stderr)\n",
        INDENT
    ));
    out.push_str(&format!(
        "{}self.assertEqual(completed.stdout, {}, 'Expected output not found')\n",
        INDENT,
        py_str(&expected)
    ));
    out
}

fn render_signature_check(item: &MarkingItem) -> String {
    let expected = normalized_parameters(&item.expected_parameters);
    let mut out = String::new();
    out.push_str(&load_function_prelude(item));
    out.push_str(&format!(
        "{}actual = str(inspect.signature(function))\n",
        INDENT
    ));
    out.push_str(&format!(
        "{}self.assertEqual(\n{}    actual,\n{}    {},\n",
        INDENT,
        INDENT,
        INDENT,
        py_str(&expected)
    ));
    out.push_str(&format!(
        "{}    {} + ' but found {}' + actual,\n",
        INDENT,
        py_str(&format!(
            "Expected signature {}{}",
            item.function_name, expected
        )),
        item.function_name
    ));
    out.push_str(&format!("{})\n", INDENT));
    out
}

fn render_function_test(item: &MarkingItem) -> String {
    // An empty case list would make the loop below a silent pass worth full
    // marks, so it renders as an explicit failure instead.
    if item.test_cases.is_empty() {
        return format!(
            "{}self.fail({})\n",
            INDENT,
            py_str(&format!(
                "No test cases configured for function {} in {}",
                item.function_name, item.target_file
            ))
        );
    }
    let mut out = String::new();
    out.push_str(&load_function_prelude(item));
    out.push_str(&format!("{}cases = [\n", INDENT));
    for case in &item.test_cases {
        let args = case.args.iter().map(py_literal).join(", ");
        let kwargs = case
            .kwargs
            .iter()
            .map(|(key, value)| format!("{}: {}", py_str(key), py_literal(value)))
            .join(", ");
        out.push_str(&format!(
            "{}    {{'args': [{}], 'kwargs': {{{}}}, 'expected': {}, 'should_raise': {}}},\n",
            INDENT,
            args,
            kwargs,
            py_str(&case.expected),
            py_str(&case.should_raise)
        ));
    }
    out.push_str(&format!("{}]\n", INDENT));
    // The module is imported once for all cases, so state leaked between
    // calls makes the later cases fail instead of being hidden by a
    // fresh import.
    out.push_str(&format!("{}for index, case in enumerate(cases, 1):\n", INDENT));
    out.push_str(&format!("{}    with self.subTest(case=index):\n", INDENT));
    out.push_str(&format!("{}        if case['should_raise']:\n", INDENT));
    out.push_str(&format!("{}            try:\n", INDENT));
    out.push_str(&format!(
        "{}                function(*case['args'], **case['kwargs'])\n",
        INDENT
    ));
    out.push_str(&format!("{}            except Exception as exc:\n", INDENT));
    out.push_str(&format!(
        "{}                self.assertEqual(type(exc).__name__, case['should_raise'])\n",
        INDENT
    ));
    out.push_str(&format!("{}            else:\n", INDENT));
    out.push_str(&format!(
        "{}                self.fail('Expected ' + case['should_raise'] + ' to be raised')\n",
        INDENT
    ));
    out.push_str(&format!("{}        elif case['expected'] == '':\n", INDENT));
    out.push_str(&format!(
        "{}            function(*case['args'], **case['kwargs'])\n",
        INDENT
    ));
    out.push_str(&format!("{}        else:\n", INDENT));
    out.push_str(&format!(
        "{}            result = function(*case['args'], **case['kwargs'])\n",
        INDENT
    ));
    out.push_str(&format!(
        "{}            self.assertEqual(repr(result), case['expected'])\n",
        INDENT
    ));
    out
}

fn render_class_test(item: &MarkingItem) -> String {
    format!(
        "{}self.fail({})\n",
        INDENT,
        py_str(&format!(
            "Marking item type class_test on {} is not supported yet",
            item.target_file
        ))
    )
}

fn load_function_prelude(item: &MarkingItem) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}module = _load_module({})\n",
        INDENT,
        py_str(&item.target_file)
    ));
    out.push_str(&format!(
        "{}function = getattr(module, {}, None)\n",
        INDENT,
        py_str(&item.function_name)
    ));
    out.push_str(&format!(
        "{}self.assertIsNotNone(function, {})\n",
        INDENT,
        py_str(&format!(
            "Function {} was not found in {}",
            item.function_name, item.target_file
        ))
    ));
    out
}

/// The expected output with the trailing line terminator the language's
/// print primitive would have added. The configuration itself is never
/// modified, only this derived copy.
fn normalized_expected_output(config: &AutograderConfig, item: &MarkingItem) -> String {
    let mut expected = item.expected_output.clone();
    if config.language.print_appends_newline()
        && !expected.is_empty()
        && !expected.ends_with('\n')
    {
        expected.push('\n');
    }
    expected
}

/// `a, b` and `(a, b)` both compare as `(a, b)`.
fn normalized_parameters(parameters: &str) -> String {
    let trimmed = parameters.trim();
    if trimmed.starts_with('(') {
        trimmed.to_string()
    } else {
        format!("({})", trimmed)
    }
}

/// A single-quoted Python string literal.
fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// A JSON value as a Python literal.
fn py_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".into(),
        Value::Bool(true) => "True".into(),
        Value::Bool(false) => "False".into(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => py_str(s),
        Value::Array(items) => format!("[{}]", items.iter().map(py_literal).join(", ")),
        Value::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(key, value)| format!("{}: {}", py_str(key), py_literal(value)))
                .join(", ")
        ),
    }
}

fn docstring_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
