use std::fmt;
use std::ops::{Add, Neg, Sub};
use fixed::types::I20F12;

/*
Signed fixed point, 20.12
All geometry math of the 3D engine (clip space, slopes, span bounds) uses this format.
Every operation wraps on 32 bit overflow like the hardware registers do; products and
quotients keep the full precision of the operands before being truncated back to 32 bit.
 */
#[derive(Copy,Clone,Default,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub struct Fixed12(I20F12);

impl Fixed12 {
    pub const FRAC_BITS : u32 = I20F12::FRAC_NBITS;
    pub const ZERO : Fixed12 = Fixed12(I20F12::ZERO);
    pub const ONE : Fixed12 = Fixed12(I20F12::ONE);

    /// Integer to fixed point
    #[inline]
    pub const fn new(value:i32) -> Self {
        Fixed12(I20F12::from_bits(value.wrapping_shl(Self::FRAC_BITS)))
    }

    #[inline]
    pub const fn from_raw(raw:i32) -> Self {
        Fixed12(I20F12::from_bits(raw))
    }

    pub fn from_f32(value:f32) -> Self {
        Fixed12(I20F12::saturating_from_num(value))
    }

    #[inline]
    pub const fn raw(&self) -> i32 {
        self.0.to_bits()
    }

    /// Integer part, rounded toward negative infinity
    #[inline]
    pub fn to_i32(&self) -> i32 {
        self.0.to_num::<i32>()
    }

    pub fn to_f32(&self) -> f32 {
        self.0.to_num::<f32>()
    }

    /// Adds an integer value
    #[inline]
    pub fn add(self,value:i32) -> Self {
        self.add_fixed(Fixed12::new(value))
    }

    #[inline]
    pub fn add_fixed(self,other:Fixed12) -> Self {
        Fixed12(self.0.wrapping_add(other.0))
    }

    #[inline]
    pub fn sub_fixed(self,other:Fixed12) -> Self {
        Fixed12(self.0.wrapping_sub(other.0))
    }

    #[inline]
    pub fn mul_fixed(self,other:Fixed12) -> Self {
        Fixed12(self.0.wrapping_mul(other.0))
    }

    /// Divides by an integer value, truncating toward zero
    #[inline]
    pub fn div(self,value:i32) -> Self {
        Fixed12(self.0.wrapping_div_int(value))
    }

    #[inline]
    pub fn div_fixed(self,other:Fixed12) -> Self {
        Fixed12(self.0.wrapping_div(other.0))
    }
}

impl Add for Fixed12 {
    type Output = Fixed12;
    fn add(self, rhs: Fixed12) -> Fixed12 {
        self.add_fixed(rhs)
    }
}

impl Sub for Fixed12 {
    type Output = Fixed12;
    fn sub(self, rhs: Fixed12) -> Fixed12 {
        self.sub_fixed(rhs)
    }
}

impl Neg for Fixed12 {
    type Output = Fixed12;
    fn neg(self) -> Fixed12 {
        Fixed12(self.0.wrapping_neg())
    }
}

impl fmt::Display for Fixed12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{:.4}",self.to_f32())
    }
}

impl fmt::Debug for Fixed12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"Fixed12({}/{:08X})",self,self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::Fixed12;

    #[test]
    fn test_integer_conversion() {
        assert_eq!(Fixed12::new(5).raw(),5 << 12);
        assert_eq!(Fixed12::new(-3).to_i32(),-3);
        // to_i32 floors
        assert_eq!(Fixed12::from_raw(-1).to_i32(),-1);
        assert_eq!(Fixed12::from_raw(0xFFF).to_i32(),0);
    }

    #[test]
    fn test_add_integer() {
        let v = Fixed12::from_raw(0x800).add(10);
        assert_eq!(v.raw(),(10 << 12) + 0x800);
    }

    #[test]
    fn test_mul_fixed() {
        let a = Fixed12::new(3);
        let b = Fixed12::from_raw(0x800); // 0.5
        assert_eq!(a.mul_fixed(b).raw(),0x1800);
        assert_eq!((-a).mul_fixed(b).raw(),-0x1800);
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        // -50 / 40 = -1.25 exactly
        assert_eq!(Fixed12::new(-50).div(40).raw(),-5120);
        // -1 raw / 2 truncates to 0, not -1
        assert_eq!(Fixed12::from_raw(-1).div(2).raw(),0);
    }

    #[test]
    fn test_div_fixed() {
        let a = Fixed12::new(128);
        let b = Fixed12::new(2);
        assert_eq!(a.div_fixed(b),Fixed12::new(64));
        let third = Fixed12::ONE.div_fixed(Fixed12::new(3));
        assert_eq!(third.raw(),1365);
    }

    #[test]
    fn test_wrapping_overflow() {
        // 256 << 12 shifted once more for division does not fit in 32 bit,
        // but the 64 bit intermediate keeps the quotient exact
        let w = Fixed12::new(256);
        assert_eq!(w.div_fixed(Fixed12::new(2)),Fixed12::new(128));
        // a result that doesn't fit is truncated to 32 bit
        let big = Fixed12::new(0x40000).mul_fixed(Fixed12::new(0x1000));
        assert_eq!(big.raw(),((0x40000i64 * 0x1000i64) << 12) as i32);
    }

    #[test]
    fn test_from_f32() {
        assert_eq!(Fixed12::from_f32(1.25).raw(),0x1400);
        assert_eq!(Fixed12::from_f32(-0.5).raw(),-0x800);
        // out of range values saturate instead of wrapping
        assert_eq!(Fixed12::from_f32(1.0e9).raw(),i32::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}",Fixed12::from_raw(0x1400)),"1.2500");
    }
}
