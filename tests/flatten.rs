use flatgrad::{Document, Event, NullReporter, WriteOptions};

fn flatten(text: &str) -> (Document, Vec<Event>, usize) {
    let mut doc = Document::parse_str(text).unwrap();
    let mut events = Vec::new();
    let count = flatgrad::flatten_gradients(&mut doc, &mut events);
    (doc, events, count)
}

fn fill_of<'a>(doc: &'a Document, id: &str) -> Option<&'a str> {
    doc.descendants()
        .find(|n| n.attribute("id") == Some(id))
        .and_then(|n| n.attribute("fill"))
}

fn style_of<'a>(doc: &'a Document, id: &str) -> Option<&'a str> {
    doc.descendants()
        .find(|n| n.attribute("id") == Some(id))
        .and_then(|n| n.attribute("style"))
}

fn write(doc: &Document) -> String {
    doc.to_string(&WriteOptions::default())
}

#[test]
fn single_gradient() {
    let (doc, events, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <defs><linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient></defs>
            <rect id='r1' fill='url(#g1)'/>
        </svg>",
    );

    assert_eq!(count, 1);
    assert_eq!(fill_of(&doc, "r1"), Some("#ff0000"));
    assert_eq!(
        events,
        vec![
            Event::GradientsFound(1),
            Event::Replaced {
                id: "g1".to_string(),
                color: "#ff0000".to_string(),
                count: 1,
            },
        ]
    );
}

#[test]
fn gradient_without_stops() {
    let (doc, events, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <defs><linearGradient id='g2'/></defs>
            <rect id='r1' fill='url(#g2)'/>
        </svg>",
    );

    assert_eq!(count, 0);
    assert_eq!(fill_of(&doc, "r1"), Some("url(#g2)"));
    assert!(events.contains(&Event::Unresolved("g2".to_string())));
    assert!(events.iter().any(|e| e.is_warning()));
}

#[test]
fn no_gradients() {
    let text = "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
        <!-- shapes -->
        <g id='g1' style='fill:url(#g1);stroke:red'>
            <rect id='r1' fill='url(#g1)'/>
            <text>Hello <tspan>big</tspan> world</text>
        </g>
        <use xlink:href='#g1'/>
    </svg>";

    let original = Document::parse_str(text).unwrap();
    let (doc, events, count) = flatten(text);

    assert_eq!(count, 0);
    assert_eq!(events, vec![Event::NoGradients]);
    assert!(!events.iter().any(|e| e.is_warning()));
    assert_eq!(write(&doc), write(&original));
}

#[test]
fn gradient_outside_of_defs_is_ignored() {
    let (doc, events, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient>
            <rect id='r1' fill='url(#g1)'/>
        </svg>",
    );

    assert_eq!(count, 0);
    assert_eq!(events, vec![Event::NoGradients]);
    assert_eq!(fill_of(&doc, "r1"), Some("url(#g1)"));
}

#[test]
fn href_chain() {
    let (doc, _, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <defs>
                <linearGradient id='g3' href='#g2'/>
                <linearGradient id='g2' xlink:href='#g1'/>
                <linearGradient id='g1'>
                    <stop offset='0'/>
                    <stop offset='0.5' style='stop-color: #00ff00'/>
                    <stop offset='1' stop-color='#0000ff'/>
                </linearGradient>
            </defs>
            <rect id='r1' fill='url(#g3)'/>
            <rect id='r2' fill='url(#g2)'/>
            <rect id='r3' fill='url(#g1)'/>
        </svg>",
    );

    assert_eq!(count, 3);
    assert_eq!(fill_of(&doc, "r1"), Some("#00ff00"));
    assert_eq!(fill_of(&doc, "r2"), Some("#00ff00"));
    assert_eq!(fill_of(&doc, "r3"), Some("#00ff00"));
}

#[test]
fn cycle() {
    let (doc, events, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <defs>
                <linearGradient id='g1' href='#g2'/>
                <linearGradient id='g2' href='#g1'/>
                <linearGradient id='g3' href='#g3'/>
            </defs>
            <rect id='r1' fill='url(#g1)'/>
            <rect id='r3' fill='url(#g3)'/>
        </svg>",
    );

    assert_eq!(count, 0);
    assert_eq!(fill_of(&doc, "r1"), Some("url(#g1)"));
    assert_eq!(fill_of(&doc, "r3"), Some("url(#g3)"));
    assert!(events.contains(&Event::RecursiveReference("g1".to_string())));
    assert!(events.contains(&Event::RecursiveReference("g2".to_string())));
    assert!(events.contains(&Event::RecursiveReference("g3".to_string())));
}

#[test]
fn style_fill() {
    let (doc, _, count) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <defs><linearGradient id='g1'><stop stop-color='blue'/></linearGradient></defs>
            <rect id='r1' style='stroke:red; fill: url(#g1) ;opacity:0.5'/>
            <rect id='r2' style='stroke:red'/>
        </svg>",
    );

    assert_eq!(count, 1);
    assert_eq!(style_of(&doc, "r1"), Some("stroke: red; fill: blue; opacity: 0.5;"));
    assert_eq!(style_of(&doc, "r2"), Some("stroke:red"));
}

#[test]
fn idempotence() {
    let text = "<svg xmlns='http://www.w3.org/2000/svg'>
        <defs>
            <linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient>
            <linearGradient id='g2'/>
        </defs>
        <rect fill='url(#g1)' style='fill:url(#g1)'/>
        <rect fill='url(#g2)'/>
    </svg>";

    let (doc, _, count) = flatten(text);
    assert_eq!(count, 2);
    let first = write(&doc);

    let mut doc = Document::parse_str(&first).unwrap();
    let count = flatgrad::flatten_gradients(&mut doc, &mut NullReporter);
    assert_eq!(count, 0);
    assert_eq!(write(&doc), first);
}

#[test]
fn resave_keeps_prefixes() {
    let (doc, _, _) = flatten(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
            <defs><linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient></defs>
            <use xlink:href='#r1'/>
            <rect id='r1' fill='url(#g1)'/>
        </svg>",
    );

    let svg = write(&doc);
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
    assert!(svg.contains("<use xlink:href=\"#r1\"/>"));
    assert!(svg.contains("<rect id=\"r1\" fill=\"#ff0000\"/>"));
    assert!(!svg.contains("ns0:"));
}

#[test]
fn svgz() {
    use std::io::Write;

    let text = "<svg xmlns='http://www.w3.org/2000/svg'>
        <defs><linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient></defs>
        <rect id='r1' fill='url(#g1)'/>
    </svg>";

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let mut doc = Document::parse_data(&data).unwrap();
    assert_eq!(flatgrad::flatten_gradients(&mut doc, &mut NullReporter), 1);
    assert_eq!(fill_of(&doc, "r1"), Some("#ff0000"));
}

#[test]
fn process_svg_writes_output() {
    let dir = std::env::temp_dir().join(format!("flatgrad-api-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.svg");
    let output = dir.join("out.svg");

    std::fs::write(
        &input,
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <defs><linearGradient id='g1'><stop stop-color='#ff0000'/></linearGradient></defs>
            <rect fill='url(#g1)'/>
        </svg>",
    )
    .unwrap();

    let count = flatgrad::process_svg(&input, &output, &mut NullReporter).unwrap();
    assert_eq!(count, 1);

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("fill=\"#ff0000\""));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn process_svg_errors() {
    let dir = std::env::temp_dir().join(format!("flatgrad-api-err-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let output = dir.join("out.svg");

    let err = flatgrad::process_svg(&dir.join("missing.svg"), &output, &mut NullReporter)
        .unwrap_err();
    assert!(matches!(err, flatgrad::Error::InputNotFound(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(!output.exists());

    let input = dir.join("broken.svg");
    std::fs::write(&input, "<svg xmlns='http://www.w3.org/2000/svg'><rect></svg>").unwrap();
    let err = flatgrad::process_svg(&input, &output, &mut NullReporter).unwrap_err();
    assert!(matches!(err, flatgrad::Error::ParsingFailed(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
