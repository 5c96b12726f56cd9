// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Gridbase

//! End-to-end compilation of table descriptors as the schema-application
//! subsystem submits them: JSON in, generated-column expressions or a full
//! error report out.

use gridbase_catalog::{FieldId, TableDef};
use gridbase_formula::compile_table;
use gridbase_type::Type;

fn table(json: &str) -> TableDef {
	serde_json::from_str(json).unwrap()
}

fn products() -> TableDef {
	table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "unit_price", "type": "decimal"},
				{"id": 2, "name": "quantity", "type": "int"},
				{"id": 3, "name": "first_name", "type": "text"},
				{"id": 4, "name": "last_name", "type": "text"},
				{"id": 5, "name": "on_sale", "type": "bool"},
				{"id": 6, "name": "price", "type": "decimal"},
				{
					"id": 7,
					"name": "total",
					"type": "formula",
					"formula": "unit_price * quantity",
					"resultType": "decimal"
				}
			]
		}"#,
	)
}

#[test]
fn compiles_arithmetic_formula_from_json() {
	let compiled = compile_table(&products()).unwrap();
	assert_eq!(compiled.len(), 1);
	assert_eq!(compiled[0].field_id, FieldId(7));
	assert_eq!(compiled[0].column_name, "total");
	assert_eq!(compiled[0].expression, r#"("unit_price" * "quantity")"#);
	assert_eq!(compiled[0].result_type, Type::Decimal);
	assert_eq!(compiled[0].depends_on, vec![FieldId(1), FieldId(2)]);
}

#[test]
fn compiles_text_concatenation() {
	let descriptor = table(
		r#"{
			"name": "people",
			"fields": [
				{"id": 1, "name": "first_name", "type": "text"},
				{"id": 2, "name": "last_name", "type": "text"},
				{
					"id": 3,
					"name": "full_name",
					"type": "formula",
					"formula": "first_name || ' ' || last_name",
					"resultType": "utf8"
				}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(compiled[0].expression, r#"(("first_name" || ' ') || "last_name")"#);
}

#[test]
fn result_type_accepts_the_stored_field_spellings() {
	let descriptor = table(
		r#"{
			"name": "people",
			"fields": [
				{"id": 1, "name": "first_name", "type": "text"},
				{"id": 2, "name": "last_name", "type": "text"},
				{
					"id": 3,
					"name": "full_name",
					"type": "formula",
					"formula": "first_name || ' ' || last_name",
					"resultType": "text"
				},
				{
					"id": 4,
					"name": "has_surname",
					"type": "formula",
					"formula": "LENGTH(last_name) > 0",
					"resultType": "boolean"
				}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(compiled[0].result_type, Type::Utf8);
	assert_eq!(compiled[1].result_type, Type::Bool);
}

#[test]
fn compiles_conditional_discount() {
	let descriptor = table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{"id": 2, "name": "on_sale", "type": "bool"},
				{
					"id": 3,
					"name": "effective_price",
					"type": "formula",
					"formula": "CASE WHEN on_sale THEN price * 0.9 ELSE price END",
					"resultType": "decimal"
				}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(
		compiled[0].expression,
		r#"(CASE WHEN "on_sale" THEN ("price" * 0.9) ELSE "price" END)"#
	);
}

#[test]
fn null_coalescing_compiles() {
	let descriptor = table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "discount", "type": "decimal"},
				{"id": 2, "name": "price", "type": "decimal"},
				{
					"id": 3,
					"name": "effective",
					"type": "formula",
					"formula": "price - COALESCE(discount, 0)",
					"resultType": "decimal"
				}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(compiled[0].expression, r#"("price" - COALESCE("discount", 0))"#);
}

#[test]
fn compilation_is_deterministic() {
	let first = compile_table(&products()).unwrap();
	let second = compile_table(&products()).unwrap();
	assert_eq!(first, second);
}

#[test]
fn whitespace_does_not_change_the_output() {
	let compact = table(
		r#"{
			"name": "t",
			"fields": [
				{"id": 1, "name": "a", "type": "int"},
				{"id": 2, "name": "b", "type": "int"},
				{"id": 3, "name": "c", "type": "formula", "formula": "a+b*2", "resultType": "int"}
			]
		}"#,
	);
	let spaced = table(
		r#"{
			"name": "t",
			"fields": [
				{"id": 1, "name": "a", "type": "int"},
				{"id": 2, "name": "b", "type": "int"},
				{"id": 3, "name": "c", "type": "formula", "formula": "  a  +  b  *  2  ", "resultType": "int"}
			]
		}"#,
	);
	assert_eq!(
		compile_table(&compact).unwrap()[0].expression,
		compile_table(&spaced).unwrap()[0].expression
	);
}

#[test]
fn reserved_word_field_names_are_quoted() {
	let descriptor = table(
		r#"{
			"name": "orders",
			"fields": [
				{"id": 1, "name": "order", "type": "int"},
				{"id": 2, "name": "select", "type": "int"},
				{"id": 3, "name": "user", "type": "text"},
				{
					"id": 4,
					"name": "summary",
					"type": "formula",
					"formula": "user || (order + select)::text",
					"resultType": "utf8"
				}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(compiled[0].expression, r#"("user" || (("order" + "select"))::text)"#);
}

#[test]
fn cycle_is_rejected_naming_every_field() {
	let descriptor = table(
		r#"{
			"name": "cyclic",
			"fields": [
				{"id": 1, "name": "a", "type": "formula", "formula": "b * 2", "resultType": "int"},
				{"id": 2, "name": "b", "type": "formula", "formula": "a + 1", "resultType": "int"}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].code(), "CYCLE_001");
	assert!(errors[0].message.contains('a'));
	assert!(errors[0].message.contains('b'));
}

#[test]
fn unresolved_reference_rejects_the_table() {
	let descriptor = table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{
					"id": 2,
					"name": "total",
					"type": "formula",
					"formula": "price * quantity",
					"resultType": "decimal"
				}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors[0].code(), "FIELD_001");
	assert!(errors[0].message.contains("quantity"));
}

#[test]
fn syntax_error_reports_position() {
	let descriptor = table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{"id": 2, "name": "quantity", "type": "int"},
				{
					"id": 3,
					"name": "total",
					"type": "formula",
					"formula": "price * * quantity",
					"resultType": "decimal"
				}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors[0].code(), "PARSE_004");
	assert_eq!(errors[0].fragment.column().map(|column| column.0), Some(9));
}

#[test]
fn errors_across_fields_are_aggregated() {
	let descriptor = table(
		r#"{
			"name": "broken",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{"id": 2, "name": "x", "type": "formula", "formula": "missing + 1", "resultType": "int"},
				{"id": 3, "name": "y", "type": "formula", "formula": "price +", "resultType": "decimal"},
				{"id": 4, "name": "z", "type": "formula", "formula": "NOSUCHFN(price)", "resultType": "decimal"}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors.len(), 3);
	let codes: Vec<&str> = errors.iter().map(|error| error.code()).collect();
	assert!(codes.contains(&"FIELD_001"));
	assert!(codes.contains(&"PARSE_003"));
	assert!(codes.contains(&"FUNCTION_001"));
}

#[test]
fn formula_chain_compiles_with_formula_dependencies() {
	let descriptor = table(
		r#"{
			"name": "orders",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{"id": 2, "name": "qty", "type": "int"},
				{"id": 3, "name": "subtotal", "type": "formula", "formula": "price * qty", "resultType": "decimal"},
				{"id": 4, "name": "tax", "type": "formula", "formula": "subtotal * 0.2", "resultType": "decimal"},
				{"id": 5, "name": "grand_total", "type": "formula", "formula": "subtotal + tax", "resultType": "decimal"}
			]
		}"#,
	);
	let compiled = compile_table(&descriptor).unwrap();
	assert_eq!(compiled.len(), 3);
	assert_eq!(compiled[2].depends_on, vec![FieldId(3), FieldId(4)]);
}

#[test]
fn volatile_functions_are_rejected() {
	let descriptor = table(
		r#"{
			"name": "events",
			"fields": [
				{"id": 1, "name": "created_at", "type": "timestamp"},
				{
					"id": 2,
					"name": "age",
					"type": "formula",
					"formula": "NOW() - created_at",
					"resultType": "timestamp"
				}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors[0].code(), "FUNCTION_004");
}

#[test]
fn declared_result_type_is_enforced() {
	let descriptor = table(
		r#"{
			"name": "products",
			"fields": [
				{"id": 1, "name": "price", "type": "decimal"},
				{
					"id": 2,
					"name": "label",
					"type": "formula",
					"formula": "price * 2",
					"resultType": "utf8"
				}
			]
		}"#,
	);
	let errors = compile_table(&descriptor).unwrap_err();
	assert_eq!(errors[0].code(), "TYPE_004");
}

#[test]
fn compiled_formula_serializes_for_the_response() {
	let compiled = compile_table(&products()).unwrap();
	let json = serde_json::to_value(&compiled[0]).unwrap();
	assert_eq!(json["fieldId"], 7);
	assert_eq!(json["columnName"], "total");
	assert_eq!(json["resultType"], "decimal");
	assert_eq!(json["dependsOn"], serde_json::json!([1, 2]));
}

#[test]
fn column_clause_is_a_generated_column() {
	let compiled = compile_table(&products()).unwrap();
	assert_eq!(
		compiled[0].column_clause(),
		r#""total" numeric GENERATED ALWAYS AS (("unit_price" * "quantity")) STORED"#
	);
}
