use crate::events::Subscription;
use crate::filters::store::StoreItem;
use crate::filters::{
    DisabledEntity, DisabledRequest, DisabledStore, EntityTypeRef, FilterStore, Shared,
    StoreUpdate,
};
use crate::selection::dragdrop::{DragPayload, DropEvent, ListContent};
use crate::selection::entity::Entity;
use crate::selection::error::ProviderError;
use crate::selection::provider::{AvailableActions, ComponentDesc, EntityAction, ProviderKind};

/// What the disabled list shows for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisabledItem {
    pub display_name: String,
    pub type_ref: EntityTypeRef,
    pub icon: &'static str,
}

impl From<&DisabledRequest> for DisabledItem {
    fn from(request: &DisabledRequest) -> Self {
        Self { display_name: request.display_name(), type_ref: request.type_ref(), icon: request.icon() }
    }
}

/// Lists the disabled store
pub struct DisabledKind {
    disabled: Shared<DisabledStore>,
    filters: Shared<FilterStore>,
}

impl DisabledKind {
    pub fn new(disabled: Shared<DisabledStore>, filters: Shared<FilterStore>) -> Self {
        Self { disabled, filters }
    }

    fn enable(&self, guids: &[String]) -> bool {
        let removed = self.disabled.borrow_mut().delete(guids);
        let enabled = !removed.is_empty();
        let mut filters = self.filters.borrow_mut();
        for request in removed {
            match request.into_entity() {
                DisabledEntity::Filter(filter) => filters.add(filter),
            }
        }
        enabled
    }
}

impl ProviderKind for DisabledKind {
    type Item = DisabledItem;

    fn list_id(&self) -> ListContent {
        ListContent::DisabledList
    }

    fn items(&self) -> Vec<(String, DisabledItem)> {
        self.disabled
            .borrow()
            .get()
            .iter()
            .map(|request| (request.uuid().to_string(), DisabledItem::from(request)))
            .collect()
    }

    fn watch(&self) -> Option<Subscription<StoreUpdate>> {
        Some(self.disabled.borrow().subscribe())
    }

    fn reorder(&self, prev: usize, curt: usize) {
        self.disabled.borrow_mut().reorder(prev, curt);
    }

    fn panel_name(&self) -> String {
        "Disabled".to_string()
    }

    fn panel_desc(&self, count: usize) -> String {
        format!("{count} disabled")
    }

    fn list_component(&self) -> Option<ComponentDesc> {
        Some(ComponentDesc::DisabledList)
    }

    fn actions(&self, selected: &[Entity<DisabledItem>]) -> AvailableActions {
        AvailableActions {
            remove: !selected.is_empty(),
            enable: !selected.is_empty(),
            ..Default::default()
        }
    }

    fn perform(&self, action: EntityAction, guids: &[String]) -> Result<bool, ProviderError> {
        match action {
            EntityAction::Remove => {
                let removed = self.disabled.borrow_mut().delete(guids);
                for request in &removed {
                    request.release();
                }
                Ok(!removed.is_empty())
            }
            EntityAction::Enable => Ok(self.enable(guids)),
            _ => Ok(false),
        }
    }

    fn is_viable(&self, dragging: Option<&DragPayload>) -> bool {
        matches!(dragging, Some(DragPayload::Filter { .. }))
    }

    fn accept_drop(&self, event: &DropEvent) -> bool {
        let DragPayload::Filter { uuid } = &event.payload else {
            return false;
        };
        let removed = self.filters.borrow_mut().delete(&[uuid]);
        let accepted = !removed.is_empty();
        let mut disabled = self.disabled.borrow_mut();
        for filter in removed {
            disabled.insert(event.current_index, DisabledRequest::new(DisabledEntity::Filter(filter)));
        }
        accepted
    }
}
