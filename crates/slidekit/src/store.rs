use serde::{Deserialize, Serialize};

use crate::model::{Slide, SlideGroup};

/// The slide store: an ordered collection of slides plus their groups.
/// Pure data with invariant-preserving mutations; the engine only computes
/// derived views over it (visible subset, current index, timer state).
///
/// Invariants held after every mutation:
/// - slide `order` values are contiguous from 0 in slide-list order
/// - group `order` values are contiguous from 0 in group-list order
/// - `Slide::group_id` and `SlideGroup::slides` agree exactly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    slides: Vec<Slide>,

    #[serde(default)]
    groups: Vec<SlideGroup>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn groups(&self) -> &[SlideGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn slide_mut(&mut self, id: &str) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&SlideGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Append a slide. Its `order` is overwritten to keep numbering
    /// contiguous; a stale `group_id` pointing at no known group is cleared,
    /// otherwise membership is recorded on the group side too.
    pub fn insert(&mut self, mut slide: Slide) {
        slide.order = self.slides.len();
        match slide.group_id.clone() {
            Some(gid) if self.groups.iter().any(|g| g.id == gid) => {
                let id = slide.id.clone();
                if let Some(group) = self.groups.iter_mut().find(|g| g.id == gid) {
                    if !group.slides.contains(&id) {
                        group.slides.push(id);
                    }
                }
            }
            Some(_) => slide.group_id = None,
            None => {}
        }
        self.slides.push(slide);
    }

    /// Duplicate an existing slide directly after the original. The host
    /// supplies the new id; identity is never invented here. Returns false
    /// when the source id is unknown.
    pub fn duplicate(&mut self, id: &str, new_id: impl Into<String>) -> bool {
        let Some(pos) = self.slides.iter().position(|s| s.id == id) else {
            return false;
        };
        let mut copy = self.slides[pos].clone();
        copy.id = new_id.into();
        if let Some(gid) = copy.group_id.clone() {
            let copy_id = copy.id.clone();
            if let Some(group) = self.groups.iter_mut().find(|g| g.id == gid) {
                group.slides.push(copy_id);
            }
        }
        self.slides.insert(pos + 1, copy);
        self.renumber_slides();
        true
    }

    /// Remove a slide, clearing its group membership. Returns false when the
    /// id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.slides.iter().position(|s| s.id == id) else {
            return false;
        };
        let removed = self.slides.remove(pos);
        if let Some(gid) = removed.group_id {
            if let Some(group) = self.groups.iter_mut().find(|g| g.id == gid) {
                group.slides.retain(|s| s != &removed.id);
            }
        }
        self.renumber_slides();
        true
    }

    /// Move the slide at `from` so it lands at `to` (both indexes into the
    /// slide list). Plain splice, then contiguous renumber. Out-of-range
    /// indexes are a no-op.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.slides.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        self.renumber_slides();
        true
    }

    /// Assign a slide to a group (or to none). Both sides of the membership
    /// relation are updated together. Unknown slide or group ids are a no-op.
    pub fn move_to_group(&mut self, slide_id: &str, group_id: Option<&str>) -> bool {
        if self.slides.iter().all(|s| s.id != slide_id) {
            return false;
        }
        if let Some(gid) = group_id {
            if self.groups.iter().all(|g| g.id != gid) {
                return false;
            }
        }

        // Detach from the current group, if any.
        for group in &mut self.groups {
            group.slides.retain(|s| s != slide_id);
        }
        if let Some(gid) = group_id {
            if let Some(group) = self.groups.iter_mut().find(|g| g.id == gid) {
                group.slides.push(slide_id.to_string());
            }
        }
        if let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) {
            slide.group_id = group_id.map(str::to_string);
        }
        true
    }

    pub fn add_group(&mut self, mut group: SlideGroup) {
        // Membership comes from slide moves, never from a freshly added group.
        group.slides.clear();
        group.order = self.groups.len();
        self.groups.push(group);
    }

    /// Remove a group; its slides become ungrouped (the slides themselves
    /// survive).
    pub fn remove_group(&mut self, id: &str) -> bool {
        let Some(pos) = self.groups.iter().position(|g| g.id == id) else {
            return false;
        };
        let removed = self.groups.remove(pos);
        for slide in &mut self.slides {
            if slide.group_id.as_deref() == Some(removed.id.as_str()) {
                slide.group_id = None;
            }
        }
        self.renumber_groups();
        true
    }

    pub fn rename_group(&mut self, id: &str, name: impl Into<String>) -> bool {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => {
                group.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_group_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => {
                group.collapsed = collapsed;
                true
            }
            None => false,
        }
    }

    /// Slides belonging to a group, in slide-list order.
    pub fn group_slides(&self, group_id: &str) -> Vec<&Slide> {
        self.slides
            .iter()
            .filter(|s| s.group_id.as_deref() == Some(group_id))
            .collect()
    }

    fn renumber_slides(&mut self) {
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.order = i;
        }
    }

    fn renumber_groups(&mut self) {
        for (i, group) in self.groups.iter_mut().enumerate() {
            group.order = i;
        }
    }
}
