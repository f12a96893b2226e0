//! Preview renderer tests.

use remix::markup::Inline;
use remix::model::{AssetId, VisualAsset};
use remix::render::{
    FontChoice, ImageAction, ImageState, PreviewNode, PreviewOptions, render_preview_with,
};
use remix::{Document, render_preview};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn ready(n: u64, caption: &str) -> VisualAsset {
    VisualAsset::pending(AssetId::numbered(n), caption, format!("prompt {n}")).with_image(PNG)
}

#[test]
fn test_interactive_image_node() {
    let doc = Document::new("Post", "[[IMAGE_1]]").with_visuals(vec![ready(1, "Cat")]);
    let tree = render_preview(&doc);

    assert_eq!(tree.nodes.len(), 1);
    let PreviewNode::Image(image) = &tree.nodes[0] else {
        panic!("expected image node, got {:?}", tree.nodes[0]);
    };
    assert_eq!(image.asset_id.as_str(), "image_1");
    assert_eq!(image.caption, "Cat");
    assert_eq!(image.prompt, "prompt 1");
    assert!(matches!(&image.state, ImageState::Ready { src } if src.starts_with("data:image/png;base64,")));
    assert!(image.actions.contains(&ImageAction::Regenerate));
    assert!(image.actions.contains(&ImageAction::Replace));
    assert!(!image.busy);
}

#[test]
fn test_pending_placeholders() {
    let body = "[[IMAGE_1]]\n\n[[IMAGE_2]]\n\n[[IMAGE_3]]";
    let doc = Document::new("Post", body).with_visuals(vec![
        ready(1, "One"),
        VisualAsset::pending("image_2", "Two", "p2"),
        VisualAsset::pending("image_3", "Three", "p3"),
    ]);
    let tree = render_preview(&doc);

    assert_eq!(tree.images().len(), 3);
    assert_eq!(tree.pending_count(), 2);
}

#[test]
fn test_missing_asset_has_no_node() {
    let doc = Document::new("Post", "Text\n\n[[IMAGE_4]]");
    let tree = render_preview(&doc);

    assert_eq!(tree.nodes.len(), 1);
    assert!(matches!(tree.nodes[0], PreviewNode::Paragraph { .. }));
}

#[test]
fn test_header_is_separate_from_body() {
    let doc = Document::new("Post", "[[IMAGE_1]]").with_visuals(vec![
        VisualAsset::pending(AssetId::header(), "Banner", "banner"),
        ready(1, "One"),
    ]);
    let tree = render_preview(&doc);

    let header = tree.header.as_ref().unwrap();
    assert!(header.asset_id.is_header());
    assert_eq!(header.state, ImageState::Pending);
    assert_eq!(tree.nodes.len(), 1);
    assert_eq!(tree.images().len(), 2);
}

#[test]
fn test_carousel_node() {
    let body = "[[IMAGE_CAROUSEL_START]]\n[[IMAGE_1]]<figcaption>First</figcaption>\n[[IMAGE_2]]\n[[IMAGE_CAROUSEL_END]]";
    let doc = Document::new("Post", body).with_visuals(vec![ready(1, "One"), ready(2, "Two")]);
    let tree = render_preview(&doc);

    assert_eq!(tree.nodes.len(), 1);
    let PreviewNode::Carousel { slides } = &tree.nodes[0] else {
        panic!("expected carousel");
    };
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].caption, "First");
    assert_eq!(slides[1].caption, "Two");
}

#[test]
fn test_orphan_tags_are_dropped() {
    let doc = Document::new("Post", "Intro text <prompt-note>loose</prompt-note>\n\n<figcaption>stray</figcaption>");
    let tree = render_preview(&doc);

    assert_eq!(
        tree.nodes,
        vec![PreviewNode::Paragraph {
            content: vec![Inline::Text("Intro text".into())]
        }]
    );
}

#[test]
fn test_attached_tags_stay_on_image() {
    let body = "[[IMAGE_1]]<figcaption>Own caption</figcaption><prompt-note>soft light</prompt-note>";
    let doc = Document::new("Post", body).with_visuals(vec![ready(1, "One")]);
    let tree = render_preview(&doc);

    assert_eq!(tree.nodes.len(), 1);
    let images = tree.images();
    assert_eq!(images[0].caption, "Own caption");
    assert_eq!(images[0].prompt_note.as_deref(), Some("soft light"));
}

#[test]
fn test_heading_content() {
    let doc = Document::new("Post", "## Why **cats**");
    let tree = render_preview(&doc);

    let PreviewNode::Heading { level, content } = &tree.nodes[0] else {
        panic!("expected heading");
    };
    assert_eq!(*level, 2);
    assert_eq!(content[0], Inline::Text("Why ".into()));
    assert!(matches!(content[1], Inline::Strong(_)));
}

#[test]
fn test_busy_flag_and_font() {
    let body = "[[IMAGE_1]]\n\n[[IMAGE_2]]";
    let doc = Document::new("Post", body).with_visuals(vec![ready(1, "One"), ready(2, "Two")]);
    let options = PreviewOptions::new()
        .with_font(FontChoice::Inter)
        .with_regenerating([AssetId::numbered(2)]);
    let tree = render_preview_with(&doc, &options);

    assert_eq!(tree.font_family, "Inter");
    let busy: Vec<bool> = tree.images().iter().map(|i| i.busy).collect();
    assert_eq!(busy, vec![false, true]);
}

#[test]
fn test_duplicate_placeholder_renders_twice() {
    let doc = Document::new("Post", "[[IMAGE_1]]\n\n[[IMAGE_1]]").with_visuals(vec![ready(1, "One")]);
    let tree = render_preview(&doc);

    let images = tree.images();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].asset_id, images[1].asset_id);
}

#[cfg(feature = "serde")]
#[test]
fn test_preview_json_shape() {
    let doc = Document::new("Post", "[[IMAGE_1]]")
        .with_visuals(vec![VisualAsset::pending("image_1", "Cat", "a cat")]);
    let json = serde_json::to_value(render_preview(&doc)).unwrap();

    let node = &json["nodes"][0];
    assert_eq!(node["kind"], "image");
    assert_eq!(node["state"], "pending");
    assert_eq!(node["assetId"], "image_1");
    assert_eq!(node["actions"], serde_json::json!(["regenerate", "replace"]));
}
