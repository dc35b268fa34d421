use super::*;

#[test]
fn expr_display() {
    let expr = 2 * Expr::var("a") - 3 * Expr::var("b") + 4 * Expr::var("c");
    assert_eq!(format!("{}", expr), "2*a + (-3)*b + 4*c");

    let expr = 2 * Expr::var("a") - 3 * Expr::var("b") + 4 * Expr::var("c") + 1;
    assert_eq!(format!("{}", expr), "2*a + (-3)*b + 4*c + 1");

    let expr = 2 * Expr::var("a") - 3 * Expr::var("b") + 4 * Expr::var("c") - 2;
    assert_eq!(format!("{}", expr), "2*a + (-3)*b + 4*c + (-2)");

    let expr = Expr::constant(3);
    assert_eq!(format!("{}", expr), "3");

    let expr = Expr::constant(-42);
    assert_eq!(format!("{}", expr), "(-42)");
}

#[test]
fn expr_add() {
    let expr1 = Expr {
        coefs: BTreeMap::from([("a".into(), -2), ("b".into(), 3)]),
        constant: 2,
    };
    let expr2 = Expr {
        coefs: BTreeMap::from([("b".into(), -4), ("c".into(), 5)]),
        constant: 3,
    };

    let expr3 = Expr {
        coefs: BTreeMap::from([("a".into(), -2), ("b".into(), -1), ("c".into(), 5)]),
        constant: 5,
    };

    assert_eq!(expr1 + expr2, expr3);
}

#[test]
fn expr_sub() {
    let expr1 = Expr {
        coefs: BTreeMap::from([("a".into(), -2), ("b".into(), 3)]),
        constant: 2,
    };
    let expr2 = Expr {
        coefs: BTreeMap::from([("b".into(), -4), ("c".into(), 5)]),
        constant: 3,
    };

    let expr3 = Expr {
        coefs: BTreeMap::from([("a".into(), -2), ("b".into(), 7), ("c".into(), -5)]),
        constant: -1,
    };

    assert_eq!(expr1 - expr2, expr3);
}

#[test]
fn expr_mul() {
    let expr1 = -2 * Expr::var("a") + 3 * Expr::var("b") + 2;
    let expr2 = -4 * Expr::var("a") + 6 * Expr::var("b") + 4;
    assert_eq!((2 * expr1).cleaned(), expr2.cleaned());

    let expr1 = -2 * Expr::var("a") + 3 * Expr::var("b") + 2;
    let expr2 = 6 * Expr::var("a") - 9 * Expr::var("b") - 6;
    assert_eq!(((-3) * expr1).cleaned(), expr2.cleaned());

    let expr1 = -2 * Expr::var("a") + 3 * Expr::var("b") + 2;
    let expr2 = Expr::constant(0);
    assert_eq!((0 * expr1).cleaned(), expr2.cleaned());
}

#[test]
fn expr_sum() {
    let expr = Expr::sum(["a", "b", "a"]);
    assert_eq!(expr.get("a"), Some(2));
    assert_eq!(expr.get("b"), Some(1));
    assert_eq!(expr.get("c"), None);
}

#[test]
fn constraint_leq_moves_rhs_to_expr() {
    let c = Expr::var("a").leq(&Expr::constant(1));
    assert_eq!(c.get_sign(), Sign::LessThan);
    assert_eq!(c.get_var("a"), Some(1));
    assert_eq!(c.get_constant(), -1);
}

#[test]
fn constraint_eq_display() {
    let c = Expr::var("a").eq(&Expr::var("b"));
    assert_eq!(format!("{}", c), "1*a + (-1)*b = 0");
}

#[test]
fn constraint_variables() {
    let c = (Expr::var("a") + Expr::var("b")).leq(&Expr::var("c"));
    assert_eq!(
        c.variables(),
        BTreeSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
    );
}
