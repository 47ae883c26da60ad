//! 过滤器解析 - 业务能力层
//!
//! 把扁平参数映射转换成要应用的 `FilterSpec` 列表

use crate::models::{FieldSpec, FilterSpec, ParamMap, ReportForm};

/// 解析要应用的过滤器
///
/// - 输出顺序遵循静态表的声明顺序
/// - 所有字段值都为空的过滤器直接省略
pub fn resolve_filters(form: &ReportForm, params: &ParamMap) -> Vec<FilterSpec> {
    form.filters
        .iter()
        .map(|def| FilterSpec {
            name: def.name.to_string(),
            checkbox: def.checkbox.clone(),
            fields: def
                .fields
                .iter()
                .map(|field| FieldSpec {
                    target: field.target.clone(),
                    kind: field.kind,
                    value: field.source.resolve(params),
                })
                .collect(),
        })
        .filter(FilterSpec::has_values)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::{ALUNOS_APTOS_FORM, TURMAS_FORM};

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_params_resolve_to_nothing() {
        assert!(resolve_filters(&TURMAS_FORM, &ParamMap::new()).is_empty());
        let blanks = params(&[("departamento", ""), ("horario", "   "), ("nomeDocente", "")]);
        assert!(resolve_filters(&TURMAS_FORM, &blanks).is_empty());
    }

    #[test]
    fn order_follows_table_not_caller() {
        let p = params(&[
            ("nomeDocente", "ANA"),
            ("departamento", "DEPARTAMENTO DE COMPUTAÇÃO - São Cristóvão"),
            ("modalidadeCurso", "PRESENCIAL"),
        ]);
        let names: Vec<_> = resolve_filters(&TURMAS_FORM, &p)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["modalidadeCurso", "departamento", "nomeDocente"]);
    }

    #[test]
    fn resolved_filter_carries_checkbox_and_value() {
        let p = params(&[("horario", "24M12")]);
        let specs = resolve_filters(&TURMAS_FORM, &p);
        assert_eq!(specs.len(), 1);
        let spec = &specs[0];
        assert_eq!(
            spec.checkbox.as_ref().map(|c| c.to_string()).as_deref(),
            Some(r#"[id="form:checkHorario"]"#)
        );
        assert_eq!(spec.fields[0].value, "24M12");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let p = params(&[("userData", "ABC123"), ("foo", "bar")]);
        assert!(resolve_filters(&TURMAS_FORM, &p).is_empty());
    }

    #[test]
    fn year_period_param_fills_two_fields() {
        let p = params(&[("componenteCurricular", "COMP0393"), ("anoPeriodoIngresso", "2023.1")]);
        let specs = resolve_filters(&ALUNOS_APTOS_FORM, &p);
        assert_eq!(specs.len(), 2);
        let values: Vec<_> = specs[1].fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["2023", "1"]);
    }
}
