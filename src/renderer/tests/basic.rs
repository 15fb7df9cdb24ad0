use pretty_assertions::assert_eq;

use crate::context::Context;
use crate::engine::Engine;
use crate::errors::Result;
use crate::value::{Map, Value};

use super::Review;

fn render_template(content: &str, context: Context) -> Result<String> {
    Engine::new(context).render(content)
}

#[test]
fn render_simple_string() {
    let result = render_template("<h1>Hello world</h1>", Context::new());
    assert_eq!(result.unwrap(), "<h1>Hello world</h1>".to_owned());
}

#[test]
fn text_without_directives_is_unchanged() {
    let inputs = vec!["", "a", "{ not a token }", "% } }} %}", "50% off {", "héllo wörld ✓"];
    for input in inputs {
        assert_eq!(render_template(input, Context::new()).unwrap(), input);
    }
}

#[test]
fn render_variable_block_ident() {
    let mut context = Context::new();
    context.insert("name", "john");
    context.insert("a", 2);
    context.insert("pi", 3.5);
    context.insert("yes", true);
    context.insert("numbers", vec![1, 2, 3]);
    context.insert("nothing", Value::Null);
    context.try_insert("review", &Review::new()).unwrap();

    let inputs = vec![
        ("{{ name }}", "john"),
        ("{{name}}", "john"),
        ("{{   name\n}}", "john"),
        ("{{ a }}", "2"),
        ("{{ pi }}", "3.5"),
        ("{{ yes }}", "true"),
        ("{{ numbers }}", "[1, 2, 3]"),
        ("{{ nothing }}", ""),
        ("{{ review.title }}", "My review"),
        ("{{ review.paragraphs }}", "[A, B, C]"),
        ("{{ review }}", "[object]"),
        ("{{ this.name }}", "john"),
        ("{{ THIS.review.stars }}", "4"),
        ("{{ unknown }}", ""),
        ("{{ review.unknown.deeper }}", ""),
        ("<{{ name }}|{{ a }}>", "<john|2>"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, context.clone()).unwrap(), expected);
    }
}

#[test]
fn interpolates_map_values() {
    let mut context = Context::new();
    context.insert("test1", 100);
    context.insert("test2", 200);
    context.insert("test3", 300);
    let result = render_template("X={{ test1 }}, Y={{ test2 }}, Z={{test3}}", context);
    assert_eq!(result.unwrap(), "X=100, Y=200, Z=300");
}

#[test]
fn loops_over_this() {
    let mut engine = Engine::new(vec!["Hello", "World", "Bye"]);
    let result = engine.render("{% foreach s in this %}[{{ s }}]{% endfor %}");
    assert_eq!(result.unwrap(), "[Hello][World][Bye]");
}

#[test]
fn render_for() {
    let mut context = Context::new();
    let mut map = Map::new();
    map.insert("name".to_string(), Value::from("bob"));
    map.insert("age".to_string(), Value::from(18));

    context.insert("data", vec![1, 2, 3]);
    context.insert("notes", vec![1, 2, 3]);
    context.insert("vectors", vec![vec![0, 3], vec![3, 4]]);
    context.insert("empty", Vec::<usize>::new());
    context.insert("map", map);
    context.insert("word", "héllo");
    context.insert("number", 7);
    context.try_insert("review", &Review::new()).unwrap();

    let inputs = vec![
        ("{% foreach i in data %}{{i}}{% endfor %}", "123"),
        ("{% foreach v in vectors %}{{v}}{% endfor %}", "[0, 3][3, 4]"),
        ("{% foreach v in vectors %}{% foreach i in v %}{{i}}{% endfor %};{% endfor %}", "03;34;"),
        (
            "{% foreach p in review.paragraphs %}<p>{{ p }}</p>{% endfor %}",
            "<p>A</p><p>B</p><p>C</p>",
        ),
        ("{% foreach kv in map %}{{ kv.key }}={{ kv.value }} {% endfor %}", "name=bob age=18 "),
        ("{% foreach c in word %}{{ c }}.{% endfor %}", "h.é.l.l.o."),
        ("{% foreach i in empty %}x{% endfor %}-", "-"),
        ("{% foreach i in number %}x{% endfor %}-", "-"),
        ("{% foreach i in missing %}x{% endfor %}-", "-"),
        ("{%foreach i in data%}{{i}}{%endfor%}", "123"),
        ("a{% foreach i in data %} {% endfor %}b", "a   b"),
    ];

    for (input, expected) in inputs {
        println!("{:?} -> {:?}", input, expected);
        assert_eq!(render_template(input, context.clone()).unwrap(), expected);
    }
}

#[test]
fn loop_variable_shadows_context() {
    let mut context = Context::new();
    context.insert("x", "outer");
    context.insert("items", vec!["a", "b"]);
    let template = "{{ x }}|{% foreach x in items %}{{ x }}{% endfor %}|{{ x }}";
    assert_eq!(render_template(template, context).unwrap(), "outer|ab|outer");
}

#[test]
fn nested_loops_can_reuse_a_name() {
    let mut context = Context::new();
    context.insert("rows", vec![vec![1, 2], vec![3]]);
    let template =
        "{% foreach r in rows %}({% foreach r in r %}{{ r }}{% endfor %}:{{ r }}){% endfor %}";
    assert_eq!(render_template(template, context).unwrap(), "(12:[1, 2])(3:[3])");
}

#[test]
fn outer_loop_variables_stay_visible() {
    let mut context = Context::new();
    context.insert("groups", vec!["g1", "g2"]);
    context.insert("items", vec![1, 2]);
    let template =
        "{% foreach g in groups %}{% foreach i in items %}{{ g }}.{{ i }} {% endfor %}{% endfor %}";
    assert_eq!(render_template(template, context).unwrap(), "g1.1 g1.2 g2.1 g2.2 ");
}

#[test]
fn loop_bindings_are_gone_after_render() {
    let mut engine = Engine::new(vec![1, 2]);
    engine.render("{% foreach i in this %}{{ i }}{% endfor %}").unwrap();
    assert_eq!(engine.render("{{ i }}").unwrap(), "");
}

#[test]
fn render_if_else() {
    let mut context = Context::new();
    context.insert("test", 1);
    let template = "{% if test > 10 %}big{% else %}small{% endif %}";
    assert_eq!(render_template(template, context).unwrap(), "small");

    let mut context = Context::new();
    context.insert("test", 11);
    assert_eq!(render_template(template, context).unwrap(), "big");
}

#[test]
fn if_without_else_renders_nothing_when_false() {
    let mut context = Context::new();
    context.insert("n", 3);
    assert_eq!(render_template("a{% if n == 4 %}b{% endif %}c", context.clone()).unwrap(), "ac");
    assert_eq!(render_template("a{% if n == 3 %}b{% endif %}c", context).unwrap(), "abc");
}

#[test]
fn nested_ifs_keep_their_own_else() {
    let mut context = Context::new();
    context.insert("a", 1);
    context.insert("b", 2);
    let template = "{% if a == 1 %}{% if b == 3 %}x{% else %}y{% endif %}{% else %}z{% endif %}";
    assert_eq!(render_template(template, context.clone()).unwrap(), "y");

    let template = "{% if a == 2 %}{% if b == 2 %}x{% else %}y{% endif %}{% else %}z{% endif %}";
    assert_eq!(render_template(template, context).unwrap(), "z");
}

#[test]
fn loops_and_conditions_mix() {
    let mut context = Context::new();
    context.insert("numbers", vec![1, 5, 10, 20]);
    let template = "{% foreach n in numbers %}\
                    {% if n >= 10 %}[{{ n }}]{% else %}{{ n }}{% endif %}\
                    {% endfor %}";
    assert_eq!(render_template(template, context).unwrap(), "15[10][20]");
}

#[test]
fn unknown_directive_is_skipped() {
    let mut context = Context::new();
    context.insert("name", "bob");
    let result = render_template("a{% set x = 1 %}b{{ name }}", context);
    assert_eq!(result.unwrap(), "a x = 1 %}bbob");
}

#[test]
fn stray_terminator_is_an_unknown_directive() {
    let result = render_template("a{% endif %}b", Context::new());
    assert_eq!(result.unwrap(), "a %}b");
}

#[test]
fn syntax_is_not_checked_in_skipped_branches() {
    let mut context = Context::new();
    context.insert("n", 1);
    let template = "{% if n == 2 %}{% foreach x %}{% endfor %}{% else %}ok{% endif %}";
    assert_eq!(render_template(template, context).unwrap(), "ok");
}
