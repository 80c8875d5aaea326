//! End-to-end rendering with the fonts installed on this machine.
//!
//! Every test skips (with a note on stderr) when no usable font is found, so the
//! suite stays green on minimal CI images.

use std::io::Read;

use eqdraw::{ContextOptions, DrawContext, Node, RenderError, Rgba};

fn system_context(font_size: f32) -> Option<DrawContext> {
    let options = ContextOptions {
        font_size,
        ..Default::default()
    };
    match DrawContext::new(&options) {
        Ok(dc) => Some(dc),
        Err(err) => {
            eprintln!("skipping: no usable system font ({err})");
            None
        }
    }
}

fn ink(canvas: &eqdraw::Canvas) -> usize {
    canvas
        .pixels()
        .iter()
        .filter(|px| **px != [255, 255, 255, 255])
        .count()
}

#[test]
fn renders_line_equation() {
    let Some(mut dc) = system_context(24.0) else {
        return;
    };
    let canvas = eqdraw::render("y = mx + b/2", &mut dc, Some(Rgba::WHITE))
        .unwrap()
        .unwrap();
    assert!(canvas.width() > 0 && canvas.height() > 0);
    assert!(ink(&canvas) > 0, "nothing was drawn");
}

#[test]
fn canvas_matches_root_bounds() {
    let Some(mut dc) = system_context(24.0) else {
        return;
    };
    let mut node = eqdraw::parse("sqrt(12 - a) + (1 + 2)/(2+1)").unwrap().unwrap();
    let canvas = dc.draw_rgba(&mut node, None).unwrap();
    let size = node.bounds().unwrap();
    assert_eq!(size.width.ceil() as u32, canvas.width());
    assert_eq!(size.height.ceil() as u32, canvas.height());
}

#[test]
fn larger_font_gives_larger_image() {
    let (Some(mut small), Some(mut large)) = (system_context(16.0), system_context(48.0)) else {
        return;
    };
    let small = eqdraw::render("1 + 2", &mut small, None).unwrap().unwrap();
    let large = eqdraw::render("1 + 2", &mut large, None).unwrap().unwrap();
    assert!(large.width() > small.width());
    assert!(large.height() > small.height());
}

#[test]
fn brackets_grow_around_fractions() {
    let Some(dc) = system_context(24.0) else {
        return;
    };
    let mut flat = Node::paren(Node::term("1"));
    let mut tall = Node::paren(Node::div(Node::term("1"), Node::term("2")));
    let flat = flat.layout(&dc).unwrap();
    let tall = tall.layout(&dc).unwrap();
    assert!(tall.height > flat.height);
}

#[test]
fn unmatched_parenthesis_fails_before_layout() {
    let Some(mut dc) = system_context(24.0) else {
        return;
    };
    let err = eqdraw::render("1 + 2)", &mut dc, None).unwrap_err();
    assert!(matches!(err, RenderError::Parse(_)), "{err:?}");
}

#[test]
fn writes_ppm() -> anyhow::Result<()> {
    let Some(mut dc) = system_context(24.0) else {
        return Ok(());
    };
    let canvas = eqdraw::render("2(b+1)", &mut dc, Some(Rgba::WHITE))?.unwrap();

    let mut file = tempfile::NamedTempFile::new()?;
    canvas.write_ppm(&mut file)?;

    let mut bytes = Vec::new();
    file.reopen()?.read_to_end(&mut bytes)?;
    let header = format!("P6\n{} {}\n255\n", canvas.width(), canvas.height());
    assert!(bytes.starts_with(header.as_bytes()));
    let pixels = (canvas.width() * canvas.height() * 3) as usize;
    assert_eq!(header.len() + pixels, bytes.len());
    Ok(())
}

#[test]
fn writes_png() -> anyhow::Result<()> {
    let Some(mut dc) = system_context(24.0) else {
        return Ok(());
    };
    let canvas = eqdraw::render("sqrt(1/x)", &mut dc, None)?.unwrap();

    let mut file = tempfile::NamedTempFile::new()?;
    canvas.write_png(&mut file)?;

    let mut reader = png::Decoder::new(std::io::BufReader::new(file.reopen()?)).read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    assert_eq!((canvas.width(), canvas.height()), (info.width, info.height));
    // Transparent background, opaque ink somewhere.
    assert!(buf.chunks(4).any(|px| px[3] == 0));
    assert!(buf.chunks(4).any(|px| px[3] == 255));
    Ok(())
}
