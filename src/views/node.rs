use crate::core::geo::{Point, Rect, Size};
use crate::rendering::visual::Visual;

/// One visual owned by a view
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub visual: Visual,
    pub z_index: i32,
    pub visible: bool,
}

/// Base scene-graph node: a local transform, a bounding box, a z key and an
/// ordered child list. Children keep insertion order; sorting by z happens
/// only when a frame is composed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    /// Top-left corner relative to the parent
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    pub visible: bool,
    pub alpha: f32,
    children: Vec<Child>,
    dirty: bool,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            position: Point::default(),
            width: 0.0,
            height: 0.0,
            z_index: 0,
            visible: true,
            alpha: 1.0,
            children: Vec::new(),
            dirty: true,
        }
    }
}

impl ViewNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visual and returns its index
    pub fn add_child(&mut self, visual: Visual, z_index: i32) -> usize {
        self.children.push(Child {
            visual,
            z_index,
            visible: true,
        });
        self.children.len() - 1
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Child> {
        self.children.get_mut(index)
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Children by ascending z, ties in insertion order
    pub fn sorted_children(&self) -> Vec<&Child> {
        let mut children: Vec<&Child> = self.children.iter().collect();
        children.sort_by_key(|child| child.z_index);
        children
    }

    /// Cache keys of the textures held by the children
    pub fn texture_keys(&self) -> Vec<String> {
        self.children
            .iter()
            .filter_map(|child| child.visual.texture())
            .map(|texture| texture.key().to_string())
            .collect()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn set_center(&mut self, center: Point) {
        self.position = Point::new(center.x - self.width / 2.0, center.y - self.height / 2.0);
    }

    /// Hit test against the bounding box, in parent coordinates
    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(&point)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(label: &str) -> Visual {
        Visual::Text {
            text: label.to_string(),
            position: Point::default(),
            font_size: 12.0,
            color: 0xffffff,
        }
    }

    #[test]
    fn test_sorted_children_are_stable() {
        let mut node = ViewNode::new();
        node.add_child(text("top"), 6);
        node.add_child(text("first"), 0);
        node.add_child(text("second"), 0);

        let order: Vec<_> = node
            .sorted_children()
            .iter()
            .map(|child| match &child.visual {
                Visual::Text { text, .. } => text.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["first", "second", "top"]);
        // insertion order itself is untouched
        assert_eq!(node.children()[0].z_index, 6);
    }

    #[test]
    fn test_center_and_hit_test() {
        let mut node = ViewNode::new();
        node.set_size(70.0, 70.0);
        node.set_center(Point::new(105.0, 35.0));

        assert_eq!(node.position, Point::new(70.0, 0.0));
        assert_eq!(node.center(), Point::new(105.0, 35.0));
        assert!(node.contains(Point::new(100.0, 60.0)));
        assert!(!node.contains(Point::new(20.0, 60.0)));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut node = ViewNode::new();
        assert!(node.is_dirty());
        node.mark_clean();
        assert!(!node.is_dirty());
        node.mark_dirty();
        assert!(node.is_dirty());
    }
}
