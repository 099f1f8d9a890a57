use super::*;

fn trimmed(q: &Composer) -> String {
    q.sql().trim().to_string()
}

#[test]
fn renders_reference_select() {
    let mut q = Composer::new();
    q.select("*")
        .from("test_temp")
        .where_("id")
        .eq("30000")
        .and("id")
        .gt("40000")
        .or("title")
        .neq("title_01")
        .limit(100, 20);

    assert_eq!(
        trimmed(&q),
        r#"SELECT *  FROM `test_temp`  WHERE id   = "30000"   AND id   > "40000"   OR title   != "title_01"  LIMIT 100,20"#
    );
}

#[test]
fn renders_insert() {
    let mut q = Composer::new();
    q.insert_table("test_temp")
        .insert_fields("title,content")
        .insert_values("('fdsfds','fdsfd'),('vvvvvv','ddddd')");

    assert_eq!(
        trimmed(&q),
        "INSERT INTO  `test_temp`  (title,content)  VALUES ('fdsfds','fdsfd'),('vvvvvv','ddddd')"
    );
}

#[test]
fn renders_update() {
    let mut q = Composer::new();
    q.update_table("test_temp")
        .update_set("title='fffff',content='ccccccccccccccccccc'")
        .where_("id")
        .eq("30000")
        .or("id")
        .gt("100000");

    assert_eq!(
        trimmed(&q),
        r#"UPDATE  `test_temp`  SET title='fffff',content='ccccccccccccccccccc'  WHERE id   = "30000"   OR id   > "100000""#
    );
}

#[test]
fn renders_in_list() {
    let mut q = Composer::new();
    q.select("*").from("test_temp").where_("id").in_list("31,32,33,100");
    assert_eq!(
        trimmed(&q),
        "SELECT *  FROM `test_temp`  WHERE id   IN (31,32,33,100)"
    );
}

#[test]
fn renders_delete() {
    let mut q = Composer::new();
    q.delete()
        .from("test_temp")
        .where_("id")
        .in_list("31,32,33,500,1000");
    assert_eq!(
        trimmed(&q),
        "DELETE  FROM `test_temp`  WHERE id   IN (31,32,33,500,1000)"
    );
}

#[test]
fn clause_order_does_not_matter() {
    let mut a = Composer::new();
    a.select("id, title")
        .from_as("posts", "p")
        .left_join_as_on("users", "u", "u.id = p.user_id")
        .group_by("p.user_id")
        .having("COUNT(*) > 1")
        .order_by("p.id DESC")
        .limit(0, 10);

    let mut b = Composer::new();
    b.limit(0, 10)
        .order_by("p.id DESC")
        .having("COUNT(*) > 1")
        .group_by("p.user_id")
        .left_join_as_on("users", "u", "u.id = p.user_id")
        .from_as("posts", "p")
        .select("id, title");

    assert_eq!(a.sql(), b.sql());
    assert_eq!(
        trimmed(&a),
        "SELECT id, title  FROM `posts` AS `p`  LEFT JOIN `users` AS `u` ON u.id = p.user_id  GROUP BY p.user_id  HAVING COUNT(*) > 1  ORDER BY p.id DESC  LIMIT 0,10"
    );
}

#[test]
fn filters_keep_call_order_around_other_clauses() {
    let mut a = Composer::new();
    a.select("*")
        .from("t")
        .where_("id")
        .eq("1")
        .and("x")
        .gt("2");

    let mut b = Composer::new();
    b.where_("id").eq("1");
    b.from("t");
    b.and("x");
    b.select("*");
    b.gt("2");

    assert_eq!(a.sql(), b.sql());
    let sql = a.sql();
    let id = sql.find("id").unwrap();
    let x = sql.find(" x ").unwrap();
    assert!(id < x);
}

#[test]
fn resetting_a_category_replaces_it() {
    let mut q = Composer::new();
    q.select("*").from("a").from("b").limit(0, 1).limit_raw("?,?");
    assert_eq!(trimmed(&q), "SELECT *  FROM `b`  LIMIT ?,?");

    q.delete();
    assert_eq!(trimmed(&q), "DELETE  FROM `b`  LIMIT ?,?");
}

#[test]
fn guard_drops_operands_with_comparison_chars() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("id");
    let before = q.filters().to_vec();

    q.eq("1>2");
    assert_eq!(q.filters(), before.as_slice());

    q.and("a=b").gt("<");
    assert_eq!(q.filters(), before.as_slice());

    q.where_find_in_set("tags", "x=y");
    assert_eq!(q.filters(), before.as_slice());
}

#[test]
fn render_is_idempotent() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("a").like("%x%").order_by("a");
    assert_eq!(q.render(false), q.render(false));
    assert_eq!(q.render(true), q.render(true));
}

#[test]
fn prepared_render_unquotes_placeholders() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("id").eq("?");

    assert_eq!(q.render(true).trim(), "SELECT *  FROM `t`  WHERE id   = ?");
    assert_eq!(q.render(false).trim(), r#"SELECT *  FROM `t`  WHERE id   = "?""#);
}

#[test]
fn prepared_render_leaves_other_quotes() {
    let mut q = Composer::new();
    q.select("*")
        .from("t")
        .where_("name")
        .eq("bob")
        .and("id")
        .ge("?");

    assert_eq!(
        q.render(true).trim(),
        r#"SELECT *  FROM `t`  WHERE name   = "bob"   AND id   >= ?"#
    );
}

#[test]
fn prepared_render_keeps_quoted_placeholder_inside_literal() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("note").eq("say \"?\" now");

    assert_eq!(q.render(true), q.render(false));
    assert!(q.render(true).contains(r#"= "say "?" now""#));
}

#[test]
fn predicates_work_on_owned_composer() {
    let mut q = Composer::new();
    q.select("*").from("t");
    q.where_("id");
    q.eq("?");
    q.and("name");
    q.neq("x");

    assert_eq!(q.filters().len(), 4);
    assert!(q.filters()[1].binds_placeholder());
    assert_eq!(q.filters()[3].text(), " != \"x\" ");
}

#[test]
fn empty_composer_renders_empty_string() {
    let q = Composer::new();
    assert!(q.is_empty());
    assert_eq!(q.render(false), "");
    assert_eq!(q.render(true), "");
}

#[test]
fn clear_resets_everything() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("id").eq("1");
    q.clear();
    assert!(q.is_empty());
    assert_eq!(q.sql(), "");

    q.select("1");
    assert_eq!(trimmed(&q), "SELECT 1");
}

#[test]
fn inner_join_quotes_table_and_alias() {
    let mut q = Composer::new();
    q.inner_join_as_on("users", "u", "u.id = o.user_id")
        .from_as("orders", "o")
        .select("o.id");
    assert_eq!(
        trimmed(&q),
        "SELECT o.id  FROM `orders` AS `o`  INNER JOIN `users` AS `u` ON u.id = o.user_id"
    );
}

#[test]
fn find_in_set_renders_as_one_term() {
    let mut q = Composer::new();
    q.select("*")
        .from("t")
        .where_("id")
        .gt("0")
        .and_find_in_set("tags", "?");

    assert_eq!(
        q.render(true).trim(),
        r#"SELECT *  FROM `t`  WHERE id   > "0"   AND FIND_IN_SET(?, tags)"#
    );
}

#[test]
fn not_in_trims_the_list() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("id").not_in(" 1, 2 ");
    assert_eq!(trimmed(&q), "SELECT *  FROM `t`  WHERE id   NOT IN (1, 2)");
}

#[test]
fn display_matches_direct_render() {
    let mut q = Composer::new();
    q.select("*").from("t").where_("id").eq("?");
    assert_eq!(q.to_string(), q.render(false));
}

#[test]
fn fragment_lookup_by_category() {
    let mut q = Composer::new();
    q.select("*").from("t");
    assert_eq!(q.fragment(Category::Action), Some(" SELECT * "));
    assert_eq!(q.fragment(Category::Target), Some(" FROM `t` "));
    assert_eq!(q.fragment(Category::Pagination), None);
    assert_eq!(q.fragment(Category::Filter), None);
}
