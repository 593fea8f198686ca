use std::cell::RefCell;
use std::rc::Rc;

use crate::filters::store::{EntityStore, StoreItem};

/// Something that lists entity ids in display order
pub trait GuidSource {
    fn guids(&self) -> Vec<String>;
}

impl<T: StoreItem> GuidSource for RefCell<EntityStore<T>> {
    fn guids(&self) -> Vec<String> {
        self.borrow().guids()
    }
}

/// The cooperating lists a shift-click range may span, in display order
#[derive(Clone, Default)]
pub struct SelectionContext {
    members: Vec<Rc<dyn GuidSource>>,
}

impl SelectionContext {
    pub fn new(members: Vec<Rc<dyn GuidSource>>) -> Self {
        Self { members }
    }

    pub fn register(&mut self, member: Rc<dyn GuidSource>) {
        self.members.push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ids of every member, concatenated
    pub fn guids(&self) -> Vec<String> {
        self.members.iter().flat_map(|member| member.guids()).collect()
    }
}

impl std::fmt::Debug for SelectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext").field("members", &self.members.len()).finish()
    }
}
