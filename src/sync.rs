use super::*;

impl FormDocument {
    /// Synchronize form fields in the source container whose `name` attribute
    /// starts with `prefix` to their counterparts in the target container
    /// (same `name` attribute minus `prefix`).
    ///
    /// `select` sources are synchronized to `input[type=text]` targets.
    pub fn sync_fields(&mut self, source_id: &str, target_id: &str, prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Err(Error::EmptyPrefix);
        }
        let source = self
            .dom
            .by_id(source_id)
            .ok_or_else(|| Error::ContainerNotFound(source_id.to_string()))?;
        let target = self
            .dom
            .by_id(target_id)
            .ok_or_else(|| Error::ContainerNotFound(target_id.to_string()))?;

        for field in self.prefixed_fields(source, "input", prefix) {
            let Some(name) = self.derived_name(field, prefix) else {
                continue;
            };
            // An empty value attribute is the usual authoring default for a
            // blank text field; only a non-empty value narrows the lookup.
            let query = FieldQuery::Input {
                name,
                input_type: self.dom.attr(field, "type"),
                value: self.dom.attr(field, "value").filter(|v| !v.is_empty()),
            };
            self.transfer(field, target, query)?;
        }

        for field in self.prefixed_fields(source, "select", prefix) {
            let Some(name) = self.derived_name(field, prefix) else {
                continue;
            };
            // The print rendering has no selection widgets; a select collapses
            // to a plain text input on the target side.
            let query = FieldQuery::Input {
                name,
                input_type: Some("text".to_string()),
                value: None,
            };
            self.transfer(field, target, query)?;
        }

        for field in self.prefixed_fields(source, "textarea", prefix) {
            let Some(name) = self.derived_name(field, prefix) else {
                continue;
            };
            let query = FieldQuery::Textarea { name };
            self.transfer(field, target, query)?;
        }

        Ok(())
    }

    fn prefixed_fields(&self, container: NodeId, tag: &str, prefix: &str) -> Vec<NodeId> {
        let mut candidates = Vec::new();
        self.dom.collect_descendant_elements(container, &mut candidates);
        candidates
            .into_iter()
            .filter(|node| {
                self.dom
                    .tag_name(*node)
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(tag))
                    && self
                        .dom
                        .attr(*node, "name")
                        .is_some_and(|name| name.starts_with(prefix))
            })
            .collect()
    }

    fn derived_name(&self, field: NodeId, prefix: &str) -> Option<String> {
        self.dom
            .attr(field, "name")
            .and_then(|name| name.strip_prefix(prefix).map(str::to_string))
    }

    /// Copy the source field's live state onto the first element in the
    /// target container matching `query`, or record a warning when nothing
    /// matches. Absence of a match is never an error.
    fn transfer(
        &mut self,
        source: NodeId,
        target_container: NodeId,
        query: FieldQuery,
    ) -> Result<()> {
        let Some(found) = query.find_first(&self.dom, target_container) else {
            self.warn_line(format!("[sync] no match for {query}"));
            return Ok(());
        };

        let source_is_input = self
            .dom
            .tag_name(source)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("input"));
        if source_is_input {
            let kind = self
                .dom
                .attr(source, "type")
                .unwrap_or_default()
                .to_ascii_lowercase();
            if kind == "checkbox" || kind == "radio" {
                // Only the checked flag crosses over; the value attribute of a
                // checkbox or radio never overwrites the target's value.
                let checked = self.dom.checked(source)?;
                return self.dom.set_checked(found, checked);
            }
        }

        let value = self.dom.value(source)?;
        self.dom.set_value(found, &value)
    }
}
