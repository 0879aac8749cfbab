//! 저장된 blob을 현재 스키마 버전으로 맞추는 동기화기.

use std::borrow::Cow;

use tracing::{debug, info};

use crate::application::resolver::FieldResolver;
use crate::domain::blob::ConfigBlob;
use crate::domain::error::ConfigResult;
use crate::domain::schema::{SchemaRegistry, SectionSchema, SectionValues};

/// 동기화 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// 현재 버전으로 완전히 채워진 blob
    pub blob: ConfigBlob,
    /// 저장된 blob과 달라졌는지 여부(저장 필요)
    pub changed: bool,
    /// 값 조회에 사용된 외부 소스(저장 이후 정리 대상)
    pub consumed_sources: Vec<String>,
}

/// 저장된 blob(없으면 빈 blob)을 스키마에 맞춰 채운다.
///
/// - 현재 버전이면서 모든 필드 이름이 있으면 그대로 반환한다.
/// - 실패 시 부분 결과 없이 첫 오류를 그대로 전파한다.
pub fn reconcile(
    stored: Option<&ConfigBlob>,
    registry: &SchemaRegistry,
    resolver: &FieldResolver<'_>,
) -> ConfigResult<Reconciliation> {
    if let Some(blob) = stored
        && blob.is_current_for(registry)
    {
        debug!(version = %blob.version, "stored config is up to date");
        return Ok(Reconciliation {
            blob: blob.clone(),
            changed: false,
            consumed_sources: Vec::new(),
        });
    }

    // 스키마 밖의 섹션과 평면 키도 그대로 유지한다.
    let mut next = stored.cloned().unwrap_or_default();
    let mut consumed_sources: Vec<String> = Vec::new();

    for schema in registry.sections() {
        let resolved = {
            let partial = seeded_section(schema, &next);
            resolver.resolve_section(schema, partial.as_deref())?
        };
        for source in resolved.consumed_sources {
            if !consumed_sources.contains(&source) {
                consumed_sources.push(source);
            }
        }
        next.sections.insert(schema.name.clone(), resolved.values);
    }
    next.version = registry.current_version().to_string();

    let changed = stored != Some(&next);
    let from = stored.map(|b| b.version.as_str()).unwrap_or("<absent>");
    info!(
        from,
        to = %next.version,
        changed,
        "reconciled config"
    );

    Ok(Reconciliation {
        blob: next,
        changed,
        consumed_sources,
    })
}

/// 섹션에 없는 필드를 같은 이름의 평면 값으로 채운 부분 맵.
///
/// 타입이 맞지 않는 평면 값은 사용하지 않는다.
fn seeded_section<'b>(
    schema: &SectionSchema,
    blob: &'b ConfigBlob,
) -> Option<Cow<'b, SectionValues>> {
    let existing = blob.section(&schema.name);
    let mut seeded: Option<SectionValues> = None;

    for field in &schema.fields {
        if existing.is_some_and(|values| values.contains_key(&field.name)) {
            continue;
        }
        let Some(value) = blob.legacy_value(&field.name) else {
            continue;
        };
        if !field.value_type.matches(value) {
            debug!(section = %schema.name, field = %field.name, "legacy value has the wrong type");
            continue;
        }
        debug!(section = %schema.name, field = %field.name, "seeding field from legacy flat entry");
        seeded
            .get_or_insert_with(|| existing.cloned().unwrap_or_default())
            .insert(field.name.clone(), value.clone());
    }

    match seeded {
        Some(values) => Some(Cow::Owned(values)),
        None => existing.map(Cow::Borrowed),
    }
}
